//! pbxadd - register source files into an Xcode project.pbxproj manifest
//!
//! One registration updates three correlated tables consistently: the
//! PBXBuildFile table, the PBXFileReference table, and the Sources build
//! phase membership list.

pub mod commands;
pub mod ids;
pub mod manifest;
pub mod models;
