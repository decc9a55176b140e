use crate::algebra::Vec3;

/// Load an OBJ file as a flat triangle soup. Faces are triangulated by the
/// loader; grouping and materials in the file are ignored.
pub fn load_obj(path: &str) -> Result<Vec<[Vec3; 3]>, tobj::LoadError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let mut triangles = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let vertex = |i: u32| {
            let p = &mesh.positions[i as usize * 3..i as usize * 3 + 3];
            Vec3(p[0], p[1], p[2])
        };
        for idx in mesh.indices.chunks_exact(3) {
            triangles.push([vertex(idx[0]), vertex(idx[1]), vertex(idx[2])]);
        }
    }
    Ok(triangles)
}
