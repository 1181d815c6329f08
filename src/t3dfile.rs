use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::ast::{PropertyValue, T3dObject};
use crate::parser::{parse_t3d, SyntaxError};
use crate::util;

/// A whole map text file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct T3dFile {
    pub objects: Vec<T3dObject>,
}

impl T3dFile {
    pub fn new<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        let text = util::decode_text(&bytes);
        Ok(Self::parse(&text)?)
    }

    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            objects: parse_t3d(text)?,
        })
    }

    /// Write the objects back out as map text. The output reparses to the
    /// same objects; byte-identity with the source file is not a goal
    /// (property order follows map iteration).
    pub fn save<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for object in &self.objects {
            write_object(writer, object, 0)?;
        }
        Ok(())
    }

    pub fn map_object(&self) -> Option<&T3dObject> {
        self.objects
            .iter()
            .find(|object| object.class.eq_ignore_ascii_case("Map"))
    }

    /// The actors of the first map object.
    pub fn actors(&self) -> impl Iterator<Item = &T3dObject> + '_ {
        self.map_object()
            .into_iter()
            .flat_map(|map| map.children_of_class("Actor"))
    }
}

fn write_object<W: Write>(writer: &mut W, object: &T3dObject, depth: usize) -> std::io::Result<()> {
    let pad = "    ".repeat(depth);
    writeln!(writer, "{}Begin {}", pad, object.class)?;

    let inner = "    ".repeat(depth + 1);
    for (name, property) in &object.properties {
        match property {
            PropertyValue::Value(value) => writeln!(writer, "{}{}={}", inner, name, value)?,
            PropertyValue::Array(entries) => {
                for (index, value) in entries {
                    match index {
                        Some(index) => {
                            writeln!(writer, "{}{}({})={}", inner, name, index, value)?
                        }
                        None => writeln!(writer, "{}{}={}", inner, name, value)?,
                    }
                }
            }
        }
    }

    for (name, v) in &object.vector_properties {
        writeln!(
            writer,
            "{}{:<8} {:+013.6},{:+013.6},{:+013.6}",
            inner, name, v.x, v.y, v.z
        )?;
    }

    for child in &object.children {
        write_object(writer, child, depth + 1)?;
    }

    writeln!(writer, "{}End {}", pad, object.class)?;
    Ok(())
}
