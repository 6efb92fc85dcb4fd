//! MTL material libraries: Phong coefficients and the diffuse texture map.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};

use crate::obj::resolve_sibling;

#[derive(Clone, Debug, PartialEq)]
pub struct MtlMaterial {
    pub name: String,
    /// `Ka`
    pub ambient: [f32; 3],
    /// `Kd`
    pub diffuse: [f32; 3],
    /// `Ks`
    pub specular: [f32; 3],
    /// `Ns`
    pub shininess: f32,
    /// `map_Kd`, as written in the file.
    pub diffuse_map: Option<String>,
}

impl MtlMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.2; 3],
            diffuse: [0.5; 3],
            specular: [0.5; 3],
            shininess: 10.0,
            diffuse_map: None,
        }
    }
}

/// Materials of one `.mtl` file, keyed by `newmtl` name.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, MtlMaterial>,
    /// Directory the library was loaded from; texture paths resolve against it.
    origin: Option<PathBuf>,
}

impl MaterialLibrary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to open MTL file: {}", path.display()))?;
        let mut lib = Self::parse(&text)
            .with_context(|| format!("Failed to parse MTL file: {}", path.display()))?;
        lib.origin = Some(path.to_path_buf());
        log::info!("Loaded {} material(s) from {}", lib.len(), path.display());
        Ok(lib)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut materials = HashMap::new();
        let mut current: Option<MtlMaterial> = None;

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (tag, rest) = trimmed
                .split_once(char::is_whitespace)
                .map(|(t, r)| (t, r.trim()))
                .unwrap_or((trimmed, ""));

            if tag == "newmtl" {
                if let Some(done) = current.take() {
                    materials.insert(done.name.clone(), done);
                }
                if rest.is_empty() {
                    anyhow::bail!("newmtl without a name on line {}", line_no);
                }
                current = Some(MtlMaterial::new(rest));
                continue;
            }

            let Some(mat) = current.as_mut() else {
                log::debug!("MTL line {} outside of any material: '{}'", line_no, trimmed);
                continue;
            };
            match tag {
                "Ka" => mat.ambient = parse_rgb(rest, line_no)?,
                "Kd" => mat.diffuse = parse_rgb(rest, line_no)?,
                "Ks" => mat.specular = parse_rgb(rest, line_no)?,
                "Ns" => {
                    mat.shininess = rest
                        .parse::<f32>()
                        .with_context(|| format!("Invalid Ns on line {}", line_no))?
                }
                // Options such as `-s 1 1 1` precede the file name.
                "map_Kd" => mat.diffuse_map = rest.split_whitespace().last().map(str::to_string),
                _ => {}
            }
        }
        if let Some(done) = current {
            materials.insert(done.name.clone(), done);
        }

        Ok(Self {
            materials,
            origin: None,
        })
    }

    pub fn get(&self, name: &str) -> Option<&MtlMaterial> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// `map_Kd` of `material`, resolved next to the library file.
    pub fn diffuse_map_path(&self, material: &MtlMaterial) -> Option<PathBuf> {
        let map = material.diffuse_map.as_deref()?;
        Some(match &self.origin {
            Some(origin) => resolve_sibling(origin, map),
            None => PathBuf::from(map),
        })
    }
}

/// `r [g b]`; a single value is replicated to all channels.
fn parse_rgb(rest: &str, line_no: usize) -> Result<[f32; 3]> {
    let values = rest
        .split_whitespace()
        .map(|t| {
            t.parse::<f32>()
                .with_context(|| format!("Invalid colour component '{}' on line {}", t, line_no))
        })
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        [v] => Ok([*v; 3]),
        [r, g, b, ..] => Ok([*r, *g, *b]),
        _ => Err(anyhow!("Expected 1 or 3 colour components on line {}", line_no)),
    }
}
