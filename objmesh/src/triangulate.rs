use anyhow::{bail, Result};

use crate::parse::Face;

// a 4-corner face is really two triangles:
// [[7,1,5],      [7,1,5,
//  [5,1,3,7], -->  5,1,3, 5,3,7,
//  [4,8,6]]       4,8,6]
pub fn triangle_count(faces: &[Face]) -> usize {
    faces.iter().map(|f| f.vertex_count() - 2).sum()
}

fn fan(stream: &mut Vec<u32>, indices: &[u32]) {
    stream.extend_from_slice(&[indices[0] - 1, indices[1] - 1, indices[2] - 1]);
    if indices.len() == 4 {
        stream.extend_from_slice(&[indices[0] - 1, indices[2] - 1, indices[3] - 1]);
    }
}

// flatten the per-face position index lists into one long run of triangles,
// 3 entries each, quads split along their 0-2 diagonal. this is also where
// the file's 1-based indices finally become 0-based
pub fn position_index_stream(faces: &[Face]) -> Vec<u32> {
    let mut stream = Vec::with_capacity(3 * triangle_count(faces));
    for face in faces {
        fan(&mut stream, &face.position_indices);
    }
    stream
}

// same flattening over the texcoord index space, which obj keeps entirely
// separate from the position one. a corner without a texcoord index can't
// be fanned, so that's refused up front rather than sampled from nowhere
pub fn tex_coord_index_stream(faces: &[Face]) -> Result<Vec<u32>> {
    let mut stream = Vec::with_capacity(3 * triangle_count(faces));
    for (row, face) in faces.iter().enumerate() {
        if face.tex_coord_indices.iter().any(|&t| t == 0) {
            bail!("face {} has corners without texcoord indices", row);
        }
        fan(&mut stream, &face.tex_coord_indices);
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(positions: &[u32], tex_coords: &[u32]) -> Face {
        Face {
            position_indices: positions.iter().copied().collect(),
            tex_coord_indices: tex_coords.iter().copied().collect(),
        }
    }

    #[test]
    fn triangle_goes_zero_based() {
        let faces = [face(&[7, 1, 5], &[0, 0, 0])];
        assert_eq!(position_index_stream(&faces), vec![6, 0, 4]);
    }

    #[test]
    fn quad_fans_across_the_diagonal() {
        let faces = [face(&[5, 1, 3, 7], &[0, 0, 0, 0])];
        assert_eq!(position_index_stream(&faces), vec![4, 0, 2, 4, 2, 6]);
    }

    #[test]
    fn counts_add_one_triangle_per_quad() {
        let faces = [
            face(&[1, 2, 3], &[0, 0, 0]),
            face(&[1, 2, 3, 4], &[0, 0, 0, 0]),
            face(&[2, 3, 4, 5], &[0, 0, 0, 0]),
        ];
        assert_eq!(triangle_count(&faces), 5);
        assert_eq!(position_index_stream(&faces).len(), 15);
    }

    #[test]
    fn tex_coord_stream_follows_its_own_indices() {
        let faces = [face(&[5, 1, 3, 7], &[11, 10, 12, 9])];
        assert_eq!(
            tex_coord_index_stream(&faces).unwrap(),
            vec![10, 9, 11, 10, 11, 8]
        );
    }

    #[test]
    fn tex_coord_stream_refuses_holes() {
        let faces = [face(&[1, 2, 3], &[1, 0, 3])];
        assert!(tex_coord_index_stream(&faces).is_err());
    }
}
