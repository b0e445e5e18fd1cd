//! Document processing for `skylines-doc`
//!
//! Reads persisted JSON trees, decodes them through the registry (sniffing
//! the configured candidates when the root is untagged) and renders the
//! re-encoded tree in the configured output format.

use std::path::Path;

use skylines_core::{
    from_json, to_json, to_xml_string, Decoder, DynObject, Encodable, Encoder, TreeNode, TypeHint, Value,
};
use skylines_model::{CubicBezier, NaturalResourceCell, NetOptions, ResourceKind, Vector3};

use crate::boot_config::{BootConfig, OutputConfig, OutputFormat};
use crate::RunError;

/// Root element of the sample document
pub const SAMPLES_ROOT: &str = "Samples";

/// One value of every built-in type
pub fn samples() -> Vec<Box<dyn DynObject>> {
    vec![
        Box::new(Vector3::new(3.0, 0.0, 4.0)),
        Box::new(Vector3::vector_xz(-12.5, 40.0)),
        Box::new(CubicBezier::new(
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(25.0, 10.0, 40.0),
            Vector3::new(75.0, 10.0, 40.0),
            Vector3::new(100.0, 10.0, 0.0),
        )),
        Box::new(
            NetOptions::new("Basic Road")
                .with_follow_terrain(true)
                .with_elevation_mode("Ground"),
        ),
        Box::new(
            NaturalResourceCell::new()
                .with(ResourceKind::Ore, 120)
                .with(ResourceKind::Fertility, 35),
        ),
    ]
}

/// Encode every sample under a single root
pub fn sample_document(encoder: &Encoder<'_>) -> Result<TreeNode, RunError> {
    let mut root = TreeNode::new(SAMPLES_ROOT);
    for sample in samples() {
        encoder.encode_into(Encodable::Object(sample.as_serializable()), &mut root, None, None)?;
    }
    Ok(root)
}

/// Render a tree in the configured format
pub fn render(node: &TreeNode, output: &OutputConfig) -> Result<String, RunError> {
    match output.format {
        OutputFormat::Xml => Ok(to_xml_string(node, &output.xml_options())),
        OutputFormat::Json => Ok(to_json(node)?),
    }
}

/// Decode a document root by its tag, or by sniffing when it has none
pub fn decode_document(decoder: &Decoder<'_>, node: &TreeNode, candidates: &[String]) -> Result<Value, RunError> {
    if node.type_tag().is_some() {
        return Ok(decoder.decode(node, true, None)?);
    }

    log::debug!("'{}' carries no type tag, sniffing {} candidates", node.name(), candidates.len());
    let hints: Vec<TypeHint<'_>> = candidates.iter().map(|tag| TypeHint::Tag(tag)).collect();
    Ok(decoder.sniff(node, &hints)?)
}

/// Turn a decoded value back into a tree
pub fn reencode(encoder: &Encoder<'_>, value: &Value, name: &str) -> Result<TreeNode, RunError> {
    let node = match value {
        Value::Object(object) => encoder.encode_object(object.as_serializable())?,
        Value::Scalar(scalar) => encoder.encode(Encodable::Primitive(scalar), Some(name), Some(scalar.kind()))?,
    };
    Ok(node)
}

/// Read, decode and re-render one JSON document
pub fn process_file(
    path: &Path,
    encoder: &Encoder<'_>,
    decoder: &Decoder<'_>,
    config: &BootConfig,
) -> Result<String, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let node = from_json(&text)?;
    let value = decode_document(decoder, &node, &config.decode.candidates)?;
    log::info!("{}: {:?}", path.display(), value);

    render(&reencode(encoder, &value, node.name())?, &config.output)
}
