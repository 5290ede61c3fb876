use objmesh::{position_index_stream, triangle_count, MeshSource, RenderMesh};

#[test]
fn single_triangle_end_to_end() {
    let source = MeshSource::parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n");
    assert_eq!(triangle_count(&source.faces), 1);
    assert_eq!(source.flat_positions(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    assert_eq!(position_index_stream(&source.faces), vec![0, 1, 2]);
}

#[test]
fn single_quad_end_to_end() {
    let source = MeshSource::parse(
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
         f 1/1 2/2 3/3 4/4\n",
    );
    assert_eq!(triangle_count(&source.faces), 2);
    let mesh = RenderMesh::build(&source).unwrap();
    // two triangles sharing the quad's 0-2 diagonal
    #[rustfmt::skip]
    let expected = vec![
        0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, 0.0,
        0.0, 0.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 0.0,
    ];
    assert_eq!(mesh.vertex_positions, expected);
    #[rustfmt::skip]
    let expected_uv = vec![
        0.0, 0.0,  1.0, 0.0,  1.0, 1.0,
        0.0, 0.0,  1.0, 1.0,  0.0, 1.0,
    ];
    assert_eq!(mesh.vertex_tex_coords, expected_uv);
}

#[test]
fn output_lengths_scale_with_triangle_count() {
    // 2 triangles + 1 quad = 4 triangles once fanned
    let source = MeshSource::parse(
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
         f 1/1 2/2 3/3\n\
         f 1/1 3/3 4/4\n\
         f 1/1 2/2 3/3 4/4\n",
    );
    let triangles = triangle_count(&source.faces);
    assert_eq!(triangles, 4);
    let mesh = RenderMesh::build(&source).unwrap();
    assert_eq!(mesh.vertex_positions.len(), 9 * triangles);
    assert_eq!(mesh.vertex_tex_coords.len(), 6 * triangles);
    assert_eq!(mesh.vertex_count(), 3 * triangles);
}

#[test]
fn triangles_only_mesh_keeps_face_count() {
    let source = MeshSource::parse(
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\n\
         f 1/1 2/1 3/1\nf 3/1 2/1 1/1\n",
    );
    assert_eq!(triangle_count(&source.faces), source.faces.len());
    let mesh = RenderMesh::build(&source).unwrap();
    assert_eq!(mesh.vertex_positions.len(), 9 * source.faces.len());
}

#[test]
fn pipeline_is_deterministic() {
    let text = "v 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\n\
                vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
                f 1/1 2/2 3/3 4/4\nf 4/4 3/3 2/2\n";
    let first = RenderMesh::build(&MeshSource::parse(text)).unwrap();
    let second = RenderMesh::build(&MeshSource::parse(text)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn skipped_faces_never_reach_the_buffers() {
    // the 5-corner face is dropped with a warning; everything downstream
    // sizes to the faces that survived
    let source = MeshSource::parse(
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 2 2 2\nvt 0 0\n\
         f 1/1 2/1 3/1 4/1 5/1\n\
         f 1/1 2/1 3/1\n",
    );
    assert_eq!(source.faces.len(), 1);
    let mesh = RenderMesh::build(&source).unwrap();
    assert_eq!(mesh.vertex_positions.len(), 9);
    assert_eq!(mesh.vertex_tex_coords.len(), 6);
}

#[test]
fn split_refuses_faces_without_texcoord_indices() {
    let source = MeshSource::parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n");
    assert!(RenderMesh::build(&source).is_err());
}

#[test]
fn split_refuses_out_of_range_file_indices() {
    let source = MeshSource::parse("v 0 0 0\nv 1 0 0\nvt 0 0\nf 1/1 2/1 9/1\n");
    assert!(RenderMesh::build(&source).is_err());
}

#[test]
fn missing_file_reports_instead_of_crashing() {
    assert!(objmesh::load_indexed("definitely/not/here.obj").is_err());
}

#[test]
fn loads_both_mesh_flavors_from_disk() {
    let path = std::env::temp_dir().join("objmesh_pipeline_test.obj");
    std::fs::write(
        &path,
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nf 1/1 2/2 3/3\n",
    )
    .unwrap();
    let split = objmesh::load_render_mesh(&path).unwrap();
    assert_eq!(split.vertex_count(), 3);
    let indexed = objmesh::load_indexed(&path).unwrap();
    assert_eq!(indexed.indices, vec![0, 1, 2]);
    assert_eq!(indexed.vertex_positions, split.vertex_positions);
    std::fs::remove_file(&path).ok();
}
