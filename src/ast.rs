use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::classes::ClassInfo;
use crate::polyflags::PolyFlags;

/// An asset reference, written `Class'Some.Path'` in map text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub class: String,
    pub path: String,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}'", self.class, self.path)
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Struct(HashMap<String, Value>),
    Reference(Reference),
    Identifier(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Identifier(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Writes the value the way the editor would.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.6}", v),
            Value::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Reference(v) => write!(f, "{}", v),
            Value::Identifier(v) => write!(f, "{}", v),
            Value::Struct(fields) => {
                write!(f, "(")?;
                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                write!(f, ")")
            }
            Value::Array(values) => {
                write!(f, "(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// What a property name maps to on an object. Indexed assignments
/// (`Name(3)=...`) accumulate into `Array`, everything else is a plain
/// `Value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Value(Value),
    Array(Vec<(Option<i32>, Value)>),
}

/// CSG operation of a brush actor, from its `CsgOper=` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[allow(non_camel_case_types)]
pub enum CsgOper {
    CSG_Active,
    CSG_Add,
    CSG_Subtract,
    CSG_Intersect,
    CSG_Deintersect,
}

/// One `Begin ... End` block of map text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct T3dObject {
    /// The word after `Begin` (`Map`, `Actor`, `Polygon`, ...).
    pub class: String,
    pub children: Vec<T3dObject>,
    pub properties: HashMap<String, PropertyValue>,
    /// Geometry lines (`Vertex`, `Origin`, `Normal`, ...) in file order.
    /// Duplicate names are the norm, polygons list one `Vertex` per corner.
    pub vector_properties: Vec<(String, Vec3)>,
}

impl T3dObject {
    pub fn new(class: String) -> Self {
        Self {
            class,
            children: vec![],
            properties: HashMap::new(),
            vector_properties: vec![],
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The scalar value of a property, if it has one.
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.properties.get(name)? {
            PropertyValue::Value(value) => Some(value),
            PropertyValue::Array(_) => None,
        }
    }

    pub fn text_property(&self, name: &str) -> Option<&str> {
        self.scalar(name)?.as_text()
    }

    pub fn int_property(&self, name: &str) -> Option<i32> {
        self.scalar(name)?.as_int()
    }

    pub fn children_of_class<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a T3dObject> + 'a {
        self.children
            .iter()
            .filter(move |child| child.class.eq_ignore_ascii_case(class))
    }

    pub fn first_child_of_class<'a>(&'a self, class: &'a str) -> Option<&'a T3dObject> {
        self.children_of_class(class).next()
    }

    /// Registry entry for this object. Actor blocks carry their real class in
    /// the `Class=` attribute of the `Begin` line, so that wins over the
    /// block word.
    pub fn class_info(&self) -> Option<&'static ClassInfo> {
        let name = self.text_property("Class").unwrap_or(&self.class);
        ClassInfo::from_name(name)
    }

    pub fn poly_flags(&self) -> Option<PolyFlags> {
        self.int_property("Flags")
            .map(|bits| PolyFlags::from_bits_retain(bits as u32))
    }

    pub fn csg_oper(&self) -> Option<CsgOper> {
        self.text_property("CsgOper")?.parse().ok()
    }
}
