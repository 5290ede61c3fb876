use anyhow::{anyhow, ensure, Result};

use crate::parse::MeshSource;
use crate::triangulate::{position_index_stream, tex_coord_index_stream};

// the gpu-ready layout: no index buffer at all, one vertex slot per
// triangle corner, drawn as the plain range [0, vertex_count).
// slot i of vertex_positions and slot i of vertex_tex_coords always
// describe the same corner of the same triangle
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderMesh {
    pub vertex_positions: Vec<f32>,
    pub vertex_tex_coords: Vec<f32>,
}

impl RenderMesh {
    pub fn build(source: &MeshSource) -> Result<Self> {
        let positions = position_index_stream(&source.faces);
        let tex_coords = tex_coord_index_stream(&source.faces)?;
        split_vertices(source, &positions, &tex_coords)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_positions.len() / 3
    }
}

// obj indexes positions and texcoords independently per corner, while a
// draw call wants one index naming both. the two permutations can't be
// reconciled in place, so every corner gets its own copy of its attribute
// values; a position shared by six faces lands in the buffer six times.
// a (position, texcoord)-pair dedup table would win that memory back,
// which these model sizes have never asked for
pub fn split_vertices(
    source: &MeshSource,
    position_stream: &[u32],
    tex_coord_stream: &[u32],
) -> Result<RenderMesh> {
    ensure!(
        position_stream.len() == tex_coord_stream.len(),
        "index streams disagree: {} position entries, {} texcoord entries",
        position_stream.len(),
        tex_coord_stream.len(),
    );
    let mut mesh = RenderMesh {
        vertex_positions: Vec::with_capacity(3 * position_stream.len()),
        vertex_tex_coords: Vec::with_capacity(2 * tex_coord_stream.len()),
    };
    for (slot, (&p, &t)) in position_stream.iter().zip(tex_coord_stream).enumerate() {
        let position = source.positions.get(p as usize).ok_or_else(|| {
            anyhow!(
                "corner {}: position index {} out of range ({} positions)",
                slot,
                p,
                source.positions.len(),
            )
        })?;
        let tex_coord = source.tex_coords.get(t as usize).ok_or_else(|| {
            anyhow!(
                "corner {}: texcoord index {} out of range ({} texcoords)",
                slot,
                t,
                source.tex_coords.len(),
            )
        })?;
        mesh.vertex_positions.extend_from_slice(position);
        mesh.vertex_tex_coords.extend_from_slice(tex_coord);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::MeshSource;

    fn two_position_source() -> MeshSource {
        MeshSource {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]],
            tex_coords: vec![[0.0, 0.0], [0.5, 1.0]],
            ..Default::default()
        }
    }

    #[test]
    fn streams_drive_their_own_attribute() {
        let source = two_position_source();
        // same corner pulls position 1 but texcoord 0
        let mesh = split_vertices(&source, &[1, 0, 1], &[0, 1, 1]).unwrap();
        assert_eq!(
            mesh.vertex_positions,
            vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0]
        );
        assert_eq!(mesh.vertex_tex_coords, vec![0.0, 0.0, 0.5, 1.0, 0.5, 1.0]);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn shared_vertices_duplicate_instead_of_aliasing() {
        let source = two_position_source();
        let mesh = split_vertices(&source, &[0, 0, 0], &[1, 1, 1]).unwrap();
        assert_eq!(mesh.vertex_positions.len(), 9);
        assert!(mesh.vertex_positions.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn mismatched_stream_lengths_are_refused() {
        let source = two_position_source();
        assert!(split_vertices(&source, &[0, 0, 0], &[0, 0]).is_err());
    }

    #[test]
    fn out_of_range_indices_are_refused() {
        let source = two_position_source();
        assert!(split_vertices(&source, &[0, 0, 9], &[0, 0, 0]).is_err());
        assert!(split_vertices(&source, &[0, 0, 0], &[0, 0, 9]).is_err());
    }
}
