// the obj loading pipeline every demo in this workspace shares;
// previously each demo carried its own copy with small mutations
// and they had all drifted apart in exciting ways
//
// the flow is: read the file into memory once, count line kinds to size
// the vecs, parse into per-attribute arrays plus a face list, flatten the
// faces into triangle index streams (one per attribute, because obj gives
// every attribute its own index space), then either hand the position
// stream straight to the GPU as an index buffer or split the vertices out
// into non-indexed parallel arrays when texcoords are in play

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

mod parse;
mod split;
mod triangulate;

pub use parse::{count_elements, Face, LineCounts, MeshSource};
pub use split::{split_vertices, RenderMesh};
pub use triangulate::{position_index_stream, tex_coord_index_stream, triangle_count};

// the MyObj-style drawable: positions flattened for the GPU and the
// triangulated position indices used directly as the index buffer
pub struct IndexedMesh {
    pub vertex_positions: Vec<f32>,
    pub indices: Vec<u32>,
}

pub fn load_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
    let path = path.as_ref();
    let then = Instant::now();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading obj file {}", path.display()))?;
    let source = MeshSource::parse(&text);
    log::info!(
        "Parsed {}: {} positions, {} texcoords, {} normals, {} faces in {:?}",
        path.display(),
        source.positions.len(),
        source.tex_coords.len(),
        source.normals.len(),
        source.faces.len(),
        then.elapsed(),
    );
    Ok(source)
}

pub fn load_indexed<P: AsRef<Path>>(path: P) -> Result<IndexedMesh> {
    let source = load_source(path)?;
    Ok(IndexedMesh {
        vertex_positions: source.flat_positions(),
        indices: position_index_stream(&source.faces),
    })
}

pub fn load_render_mesh<P: AsRef<Path>>(path: P) -> Result<RenderMesh> {
    let source = load_source(path)?;
    RenderMesh::build(&source)
}
