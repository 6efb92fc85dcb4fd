//! Asset loading: OBJ meshes, MTL materials, textures and the JSON scene
//! description.

pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod scene;
pub mod texture;
