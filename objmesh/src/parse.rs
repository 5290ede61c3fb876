use arrayvec::ArrayVec;
use std::str::SplitWhitespace;

// one polygon as it appeared in the file; indices stay 1-based here and
// only go 0-based during triangulation.
// obj lets a corner skip its texcoord field ("160//12"), and 1-based
// indexing means 0 can never be a real index, so 0 marks the hole
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub position_indices: ArrayVec<u32, 4>,
    pub tex_coord_indices: ArrayVec<u32, 4>,
}

impl Face {
    pub fn vertex_count(&self) -> usize {
        self.position_indices.len()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub v_num: usize,
    pub vt_num: usize,
    pub vn_num: usize,
    pub f_num: usize,
}

// first pass: classify every line by its first character (and the second,
// to tell v/vt/vn apart) so the vecs below can be allocated at their final
// size up front; anything unrecognized is somebody else's line type
pub fn count_elements(text: &str) -> LineCounts {
    let mut counts = LineCounts::default();
    for line in text.lines() {
        let mut bytes = line.bytes();
        match (bytes.next(), bytes.next()) {
            (Some(b'v'), Some(b'n')) => counts.vn_num += 1,
            (Some(b'v'), Some(b't')) => counts.vt_num += 1,
            (Some(b'v'), _) => counts.v_num += 1,
            (Some(b'f'), _) => counts.f_num += 1,
            _ => {}
        }
    }
    counts
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshSource {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<Face>,
}

impl MeshSource {
    // second pass over the same in-memory text. working from one string
    // (instead of reopening the file like you'd be tempted to) means the
    // counts can never disagree with what actually gets stored
    pub fn parse(text: &str) -> Self {
        let counts = count_elements(text);
        let mut source = MeshSource {
            positions: Vec::with_capacity(counts.v_num),
            tex_coords: Vec::with_capacity(counts.vt_num),
            normals: Vec::with_capacity(counts.vn_num),
            faces: Vec::with_capacity(counts.f_num),
        };
        let mut face_row = 0usize;
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("v") => source.positions.push(floats(fields)),
                // vt sometimes has a third value; it gets dropped along
                // with anything after it
                Some("vt") => source.tex_coords.push(floats(fields)),
                Some("vn") => source.normals.push(floats(fields)),
                Some("f") => {
                    if let Some(face) = parse_face(fields, face_row) {
                        source.faces.push(face);
                    }
                    face_row += 1;
                }
                _ => {}
            }
        }
        source
    }

    // [[0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]...] --> [0.5, 0.5, 0.5, -0.5, 0.5, 0.5...]
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        (min, max)
    }

    // the middle of the model in x/z at its lowest y, for parking a floor
    // under whatever got loaded
    pub fn mid_bottom(&self) -> [f32; 3] {
        if self.positions.is_empty() {
            return [0.0; 3];
        }
        let (min, max) = self.bounds();
        [(min[0] + max[0]) / 2.0, min[1], (min[2] + max[2]) / 2.0]
    }
}

// keep the first N numeric fields, drop the rest. a field that won't parse
// comes through as 0.0, which is what atof would have said
fn floats<const N: usize>(fields: SplitWhitespace) -> [f32; N] {
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(fields) {
        *slot = token.parse().unwrap_or(0.0);
    }
    out
}

// face-vertex tokens look like "3/13/5", "1/3", "160//12" or plain "160":
// position index, then optional texcoord index, then the normal index which
// nothing downstream reads. faces that can't be drawn (fewer than 3 corners,
// more than 4, or a position index that's garbage) are dropped whole so
// they can't throw off triangle-count arithmetic later
fn parse_face(fields: SplitWhitespace, row: usize) -> Option<Face> {
    let mut face = Face {
        position_indices: ArrayVec::new(),
        tex_coord_indices: ArrayVec::new(),
    };
    for token in fields {
        if face.position_indices.is_full() {
            log::warn!("skipping face {}: more than 4 corners", row);
            return None;
        }
        let mut parts = token.split('/');
        let position = parts.next().and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);
        if position == 0 {
            log::warn!("skipping face {}: unusable position index in {:?}", row, token);
            return None;
        }
        face.position_indices.push(position);
        face.tex_coord_indices
            .push(parts.next().and_then(|t| t.parse().ok()).unwrap_or(0));
    }
    if face.vertex_count() < 3 {
        log::warn!("skipping face {}: only {} corners", row, face.vertex_count());
        return None;
    }
    Some(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_classifies_by_leading_characters() {
        let text = "# header\nv 0 0 0\nv 1 0 0\nvt 0.5 0.5\nvn 0 1 0\nf 1 2 1\ns off\n\ng group\n";
        let counts = count_elements(text);
        assert_eq!(
            counts,
            LineCounts {
                v_num: 2,
                vt_num: 1,
                vn_num: 1,
                f_num: 1,
            }
        );
    }

    #[test]
    fn positions_truncate_to_three_fields() {
        let source = MeshSource::parse("v 1.0 2.0 3.0 4.0 5.0\n");
        assert_eq!(source.positions, vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn tex_coords_drop_the_third_value() {
        let source = MeshSource::parse("vt 0.2 0.3 0.0\n");
        assert_eq!(source.tex_coords, vec![[0.2, 0.3]]);
    }

    #[test]
    fn unparseable_floats_degrade_to_zero() {
        let source = MeshSource::parse("v 1.0 oops 3.0\n");
        assert_eq!(source.positions, vec![[1.0, 0.0, 3.0]]);
    }

    #[test]
    fn short_lines_fill_with_zero() {
        let source = MeshSource::parse("v 1.0\n");
        assert_eq!(source.positions, vec![[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn face_tokens_split_on_slashes() {
        let source = MeshSource::parse("f 3/13/5 4/14/6 5/15/7\n");
        let face = &source.faces[0];
        assert_eq!(face.position_indices.as_slice(), &[3, 4, 5]);
        assert_eq!(face.tex_coord_indices.as_slice(), &[13, 14, 15]);
    }

    #[test]
    fn missing_texcoord_fields_record_as_zero() {
        let source = MeshSource::parse("f 160//12 161//13 162//14\n");
        let face = &source.faces[0];
        assert_eq!(face.position_indices.as_slice(), &[160, 161, 162]);
        assert_eq!(face.tex_coord_indices.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn position_only_faces_parse() {
        let source = MeshSource::parse("f 1 2 3 4\n");
        let face = &source.faces[0];
        assert_eq!(face.vertex_count(), 4);
        assert_eq!(face.position_indices.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn oversized_and_undersized_faces_are_skipped() {
        let source = MeshSource::parse("f 1 2 3 4 5\nf 1 2\nf 1 2 3\n");
        assert_eq!(source.faces.len(), 1);
        assert_eq!(source.faces[0].position_indices.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn garbage_position_index_skips_the_face() {
        let source = MeshSource::parse("f a/1 2/2 3/3\nf 0/1 2/2 3/3\nf 4 5 6\n");
        assert_eq!(source.faces.len(), 1);
        assert_eq!(source.faces[0].position_indices.as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn mid_bottom_centers_x_and_z_at_lowest_y() {
        let source = MeshSource::parse(
            "v -1 0 -3\nv 3 0 1\nv -1 2 -3\nv 3 2 1\n",
        );
        assert_eq!(source.mid_bottom(), [1.0, 0.0, -1.0]);
    }

    #[test]
    fn flat_positions_lay_out_in_file_order() {
        let source = MeshSource::parse("v 1 2 3\nv 4 5 6\n");
        assert_eq!(source.flat_positions(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
