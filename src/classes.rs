include!(concat!(env!("OUT_DIR"), "/classes_generated.rs"));

/// Rough grouping of the classes the editor writes into map text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassKind {
    Structural,
    Actor,
    Light,
    Info,
    Navigation,
    Decoration,
    Terrain,
    Pawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    name: &'static str,
    kind: ClassKind,
    placeable: bool,
}

impl ClassInfo {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn placeable(&self) -> bool {
        self.placeable
    }

    /// Class names in map text are written in whatever case the editor had
    /// them in, so the lookup ignores case.
    pub fn from_name(name: &str) -> Option<&'static ClassInfo> {
        generated::CLASS_MAP.get(name.to_lowercase().as_str())
    }
}

#[test]
fn test_from_name() {
    let info = ClassInfo::from_name("light").unwrap();
    assert_eq!(generated::Light, *info);
    assert_eq!("Light", info.name());
    assert_eq!(ClassKind::Light, info.kind());
    assert!(info.placeable());

    assert_eq!(
        ClassInfo::from_name("PLAYERSTART").unwrap().kind(),
        ClassKind::Navigation
    );
    assert!(ClassInfo::from_name("FortStandard").is_none());
}

#[test]
fn test_class_map_keys() {
    // Make sure the keys match up with the names
    for (key, info) in generated::CLASS_MAP.entries() {
        assert_eq!(*key, info.name().to_lowercase(), "'{}'", info.name());
    }
}
