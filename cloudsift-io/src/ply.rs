//! PLY format support

use crate::{ensure_exists, ensure_parent_dir, PointCloudReader, PointCloudWriter};
use cloudsift_core::{color_to_rgb8, Error, Point3f, PointCloud, Result, NEUTRAL_GRAY};
use log::debug;
use ply_rs::{
    parser::Parser,
    writer::Writer,
    ply::{Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType, ScalarType},
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const VERTEX: &str = "vertex";
const COLOR_CHANNELS: [&str; 3] = ["red", "green", "blue"];

pub struct PlyReader;
pub struct PlyWriter;

impl PointCloudReader for PlyReader {
    /// Read the `vertex` element of an ASCII or binary PLY file
    ///
    /// Colors come from `red`/`green`/`blue` scaled by 1/255; files without
    /// them get [`NEUTRAL_GRAY`] for every point.
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        ensure_exists(path)?;

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))?;

        let vertices = ply.payload.get(VERTEX).ok_or_else(|| {
            Error::MalformedInput(format!("{}: no '{}' element", path.display(), VERTEX))
        })?;

        let has_color = ply
            .header
            .elements
            .get(VERTEX)
            .map(|def| def.properties.contains_key(COLOR_CHANNELS[0]))
            .unwrap_or(false);

        let mut cloud = PointCloud::with_capacity(vertices.len());
        for vertex in vertices {
            let position = Point3f::new(
                extract_property_value(vertex, "x")?,
                extract_property_value(vertex, "y")?,
                extract_property_value(vertex, "z")?,
            );
            let color = if has_color {
                [
                    extract_property_value(vertex, COLOR_CHANNELS[0])? / 255.0,
                    extract_property_value(vertex, COLOR_CHANNELS[1])? / 255.0,
                    extract_property_value(vertex, COLOR_CHANNELS[2])? / 255.0,
                ]
            } else {
                NEUTRAL_GRAY
            };
            cloud.push(position, color);
        }

        debug!("read {} points from {}", cloud.len(), path.display());
        Ok(cloud)
    }
}

impl PointCloudWriter for PlyWriter {
    /// Write an ASCII PLY with float `x`/`y`/`z` and uchar `red`/`green`/`blue`
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
        let path = path.as_ref();
        if cloud.positions.len() != cloud.colors.len() {
            return Err(Error::MalformedInput(format!(
                "cannot write {} positions with {} colors",
                cloud.positions.len(),
                cloud.colors.len()
            )));
        }
        ensure_parent_dir(path)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = Encoding::Ascii;

        let mut vertex_element = ElementDef::new(VERTEX.to_string());
        vertex_element.count = cloud.len();
        for axis in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                axis.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        for channel in COLOR_CHANNELS {
            vertex_element.properties.add(PropertyDef::new(
                channel.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        }
        ply.header.elements.add(vertex_element);

        let vertices = cloud
            .iter()
            .map(|(position, color)| {
                let rgb = color_to_rgb8(color);
                let mut vertex = DefaultElement::new();
                vertex.insert("x".to_string(), Property::Float(position.x));
                vertex.insert("y".to_string(), Property::Float(position.y));
                vertex.insert("z".to_string(), Property::Float(position.z));
                for (channel, value) in COLOR_CHANNELS.iter().zip(rgb) {
                    vertex.insert(channel.to_string(), Property::UChar(value));
                }
                vertex
            })
            .collect();
        ply.payload.insert(VERTEX.to_string(), vertices);

        let writer_instance = Writer::new();
        writer_instance.write_ply(&mut writer, &mut ply)?;
        writer.flush()?;

        debug!("wrote {} points to {}", cloud.len(), path.display());
        Ok(())
    }
}

/// Extract a numeric property as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Char(val)) => Ok(*val as f32),
        Some(Property::UChar(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(*val as f32),
        Some(Property::UShort(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        Some(_) => Err(Error::MalformedInput(format!(
            "Property '{}' is not a scalar number",
            name
        ))),
        None => Err(Error::MalformedInput(format!("Property '{}' not found", name))),
    }
}
