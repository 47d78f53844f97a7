//! WGSL compile/link checks.
//!
//! wgpu reports invalid shaders through the device's uncaptured-error handler,
//! which cannot be tied back to the call that caused it. Running naga's
//! front-end and validator first turns those failures into a `Result`.

use std::fmt;

pub use naga::ShaderStage;

/// A WGSL source that failed to compile or link.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The source did not parse or type-check.
    Parse { label: String, diagnostic: String },
    /// The module parsed but failed IR validation (bindings, interfaces, layouts).
    Validation { label: String, diagnostic: String },
    /// A required entry point is absent or declared for a different stage.
    MissingEntryPoint {
        label: String,
        name: String,
        stage: ShaderStage,
    },
}

impl ShaderError {
    /// Label of the shader that failed.
    pub fn label(&self) -> &str {
        match self {
            ShaderError::Parse { label, .. }
            | ShaderError::Validation { label, .. }
            | ShaderError::MissingEntryPoint { label, .. } => label,
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Parse { label, diagnostic } => {
                write!(f, "shader `{label}` failed to compile:\n{diagnostic}")
            }
            ShaderError::Validation { label, diagnostic } => {
                write!(f, "shader `{label}` failed validation:\n{diagnostic}")
            }
            ShaderError::MissingEntryPoint { label, name, stage } => {
                write!(f, "shader `{label}` has no {stage:?} entry point named `{name}`")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Parses and validates `source`, then checks that each `(name, stage)` entry
/// point exists.
pub fn check_wgsl(
    label: &str,
    source: &str,
    entry_points: &[(&str, ShaderStage)],
) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        label: label.to_string(),
        diagnostic: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );

    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            label: label.to_string(),
            diagnostic: e.emit_to_string(source),
        })?;

    for &(name, stage) in entry_points {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage);

        if !found {
            return Err(ShaderError::MissingEntryPoint {
                label: label.to_string(),
                name: name.to_string(),
                stage,
            });
        }
    }

    Ok(())
}

/// Checks `source` and, if it passes, creates the wgpu shader module.
pub fn create_checked_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    entry_points: &[(&str, ShaderStage)],
) -> Result<wgpu::ShaderModule, ShaderError> {
    check_wgsl(label, source, entry_points)?;
    log::debug!("shader `{label}` passed checks");

    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
@vertex
fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;

    const ENTRY_POINTS: [(&str, ShaderStage); 2] = [
        ("vs_main", ShaderStage::Vertex),
        ("fs_main", ShaderStage::Fragment),
    ];

    #[test]
    fn valid_source_passes() {
        check_wgsl("valid", VALID, &ENTRY_POINTS).unwrap();
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = check_wgsl("broken", "fn vs_main( {", &[]).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }), "{err:?}");
        assert_eq!(err.label(), "broken");
        assert!(err.to_string().starts_with("shader `broken` failed to compile"));
    }

    #[test]
    fn undeclared_identifier_is_parse_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return missing; }";
        let err = check_wgsl("undeclared", src, &[]).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn unbound_fragment_output_fails_validation() {
        let src = "@fragment fn fs_main() -> vec4<f32> { return vec4<f32>(1.0); }";
        let err = check_wgsl("unbound", src, &[]).unwrap_err();
        assert!(matches!(err, ShaderError::Validation { .. }), "{err:?}");
    }

    #[test]
    fn uniform_without_binding_fails_validation() {
        let src = r#"
struct T {
    m: mat4x4<f32>,
};

var<uniform> t: T;

@vertex
fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
    return t.m * vec4<f32>(pos, 1.0);
}
"#;
        let err = check_wgsl("no binding", src, &[]).unwrap_err();
        assert!(matches!(err, ShaderError::Validation { .. }), "{err:?}");
        assert_eq!(err.label(), "no binding");
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let err = check_wgsl("valid", VALID, &[("main", ShaderStage::Vertex)]).unwrap_err();
        assert_eq!(
            err,
            ShaderError::MissingEntryPoint {
                label: "valid".into(),
                name: "main".into(),
                stage: ShaderStage::Vertex,
            }
        );
    }

    #[test]
    fn entry_point_stage_must_match() {
        let err = check_wgsl("valid", VALID, &[("vs_main", ShaderStage::Fragment)]).unwrap_err();
        assert!(matches!(err, ShaderError::MissingEntryPoint { .. }), "{err:?}");
    }
}
