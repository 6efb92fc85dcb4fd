//! Wavefront OBJ parser: positions, texture coordinates, normals, polygonal
//! faces and the `mtllib`/`usemtl` material references.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    str::SplitWhitespace,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::{MeshData, MeshVertex};

/// Parsed OBJ file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjModel {
    pub mesh: MeshData,
    /// File named by `mtllib`, as written in the OBJ.
    pub material_library: Option<String>,
    /// Last material selected with `usemtl`.
    pub material_name: Option<String>,
}

impl ObjModel {
    /// `mtllib` resolved against the directory of the OBJ file.
    pub fn material_library_path(&self, obj_path: &Path) -> Option<PathBuf> {
        let lib = self.material_library.as_ref()?;
        Some(resolve_sibling(obj_path, lib))
    }
}

/// Resolve `name` relative to the directory containing `file`.
pub fn resolve_sibling(file: &Path, name: &str) -> PathBuf {
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    file.parent()
        .map(|dir| dir.join(candidate))
        .unwrap_or_else(|| candidate.to_path_buf())
}

/// Load an OBJ model from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<ObjModel> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let model = load_obj_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded OBJ {}: {} vertices, {} triangles",
        path.display(),
        model.mesh.vertices.len(),
        model.mesh.triangle_count()
    );
    Ok(model)
}

/// Load an OBJ model from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<ObjModel> {
    let mut parser = ObjParser::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        parser.feed(&line, line_no + 1)?;
    }
    parser.finish()
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<ObjModel> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// (position, texcoord, normal) indices of one face corner, 0-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Corner(usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct ObjParser {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    unique: HashMap<Corner, u32>,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    /// Vertices that had no `vn` and receive accumulated face normals.
    needs_normal: Vec<bool>,
    material_library: Option<String>,
    material_name: Option<String>,
}

impl ObjParser {
    fn feed(&mut self, line: &str, line_no: usize) -> Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            return Ok(());
        };

        match tag {
            "v" => {
                let p = parse_floats::<3>(&mut parts, line_no, "vertex position")?;
                self.positions.push(p);
            }
            "vt" => {
                let t = parse_floats::<2>(&mut parts, line_no, "texture coordinate")?;
                self.texcoords.push(t);
            }
            "vn" => {
                let n = parse_floats::<3>(&mut parts, line_no, "normal")?;
                self.normals.push(n);
            }
            "f" => self.face(parts, line_no)?,
            "mtllib" => self.material_library = rest_of_line(trimmed, tag),
            "usemtl" => self.material_name = rest_of_line(trimmed, tag),
            _ => {
                // o/g/s and friends carry nothing we render
            }
        }
        Ok(())
    }

    fn face(&mut self, parts: SplitWhitespace<'_>, line_no: usize) -> Result<()> {
        let mut corners: Vec<u32> = Vec::new();
        for token in parts {
            let corner = self.parse_corner(token, line_no)?;
            corners.push(self.vertex_for(corner, line_no)?);
        }

        if corners.len() < 3 {
            log::warn!("Skipping degenerate face on line {line_no}");
            return Ok(());
        }
        // Fan triangulation
        for k in 1..(corners.len() - 1) {
            let tri = [corners[0], corners[k], corners[k + 1]];
            self.indices.extend_from_slice(&tri);
            self.accumulate_face_normal(tri);
        }
        Ok(())
    }

    fn parse_corner(&self, token: &str, line_no: usize) -> Result<Corner> {
        let mut split = token.split('/');
        let pos = split
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no))?;
        let pos = resolve_index(pos, self.positions.len(), line_no)?;

        let mut optional = |len: usize| -> Result<Option<usize>> {
            match split.next() {
                Some(value) if !value.is_empty() => Ok(Some(resolve_index(value, len, line_no)?)),
                _ => Ok(None),
            }
        };
        let tex = optional(self.texcoords.len())?;
        let norm = optional(self.normals.len())?;
        Ok(Corner(pos, tex, norm))
    }

    fn vertex_for(&mut self, corner: Corner, line_no: usize) -> Result<u32> {
        if let Some(&idx) = self.unique.get(&corner) {
            return Ok(idx);
        }

        let Corner(pi, ti, ni) = corner;
        let position = self.positions[pi];
        let uv = ti.map(|i| self.texcoords[i]).unwrap_or([0.0, 0.0]);
        let normal = ni.map(|i| self.normals[i]).unwrap_or([0.0, 0.0, 0.0]);

        let idx = u32::try_from(self.vertices.len())
            .map_err(|_| anyhow!("Too many vertices in OBJ (>{}) on line {}", u32::MAX, line_no))?;
        self.vertices.push(MeshVertex::new(position, normal, uv));
        self.needs_normal.push(ni.is_none());
        self.unique.insert(corner, idx);
        Ok(idx)
    }

    fn accumulate_face_normal(&mut self, tri: [u32; 3]) {
        if !tri.iter().any(|&i| self.needs_normal[i as usize]) {
            return;
        }
        let [a, b, c] = tri.map(|i| self.vertices[i as usize].position);
        let e1 = sub(b, a);
        let e2 = sub(c, a);
        let n = cross(e1, e2);
        for &i in &tri {
            if self.needs_normal[i as usize] {
                let v = &mut self.vertices[i as usize].normal;
                for k in 0..3 {
                    v[k] += n[k];
                }
            }
        }
    }

    fn finish(mut self) -> Result<ObjModel> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            anyhow::bail!("OBJ contained no triangles");
        }

        for (v, needs) in self.vertices.iter_mut().zip(&self.needs_normal) {
            if *needs {
                v.normal = normalize_or(v.normal, [0.0, 0.0, 1.0]);
            }
        }

        Ok(ObjModel {
            mesh: MeshData::new(self.vertices, self.indices),
            material_library: self.material_library,
            material_name: self.material_name,
        })
    }
}

/// Everything after the directive keyword; names may contain spaces.
fn rest_of_line(line: &str, tag: &str) -> Option<String> {
    let rest = line[tag.len()..].trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn parse_floats<const N: usize>(
    parts: &mut SplitWhitespace<'_>,
    line_no: usize,
    what: &str,
) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts
            .next()
            .ok_or_else(|| anyhow!("Missing component {} of {} on line {}", i, what, line_no))?;
        *slot = token
            .parse::<f32>()
            .with_context(|| format!("Failed to parse {} on line {}", what, line_no))?;
    }
    Ok(out)
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no);
    }

    // Negative indices count back from the most recent element.
    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no
        );
    }
    Ok(idx as usize)
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 1e-12 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            mtllib cube.mtl
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            usemtl Material
            f 1/1/1 2/2/1 3/3/1
        "#;
        let model = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(model.mesh.vertices.len(), 3);
        assert_eq!(model.mesh.indices, vec![0, 1, 2]);
        assert_eq!(model.mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(model.material_library.as_deref(), Some("cube.mtl"));
        assert_eq!(model.material_name.as_deref(), Some("Material"));
    }

    #[test]
    fn quad_is_fan_triangulated_and_shared_corners_dedup() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        let model = load_obj_from_str(src).unwrap();
        assert_eq!(model.mesh.vertices.len(), 4);
        assert_eq!(model.mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_indices_count_from_end() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let model = load_obj_from_str(src).unwrap();
        assert_eq!(model.mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn missing_normals_are_generated() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let model = load_obj_from_str(src).unwrap();
        for v in &model.mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = load_obj_from_str("v 0 0 0\nv 1 0 0\nf 1 2 7\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");

        let err = load_obj_from_str("v 0 0\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");

        let err = load_obj_from_str("v 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(err.to_string().contains("1-based"), "{err}");
    }

    #[test]
    fn file_without_faces_is_rejected() {
        assert!(load_obj_from_str("v 0 0 0\n# nothing else\n").is_err());
    }

    #[test]
    fn material_library_resolves_next_to_obj() {
        let model = ObjModel {
            material_library: Some("cube.mtl".into()),
            ..Default::default()
        };
        let p = model
            .material_library_path(Path::new("models/cube/cube.obj"))
            .unwrap();
        assert_eq!(p, Path::new("models/cube/cube.mtl"));
    }
}
