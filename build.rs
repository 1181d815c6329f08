use serde::Deserialize;
use std::{
    collections::HashSet,
    env,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Deserialize)]
struct ClassEntry {
    name: String,
    kind: String,
    #[serde(default)]
    placeable: bool,
}

fn kind_variant(kind: &str) -> &'static str {
    match kind {
        "structural" => "Structural",
        "actor" => "Actor",
        "light" => "Light",
        "info" => "Info",
        "navigation" => "Navigation",
        "decoration" => "Decoration",
        "terrain" => "Terrain",
        "pawn" => "Pawn",
        unknown => panic!("unknown class kind in classes.txt: {}", unknown),
    }
}

fn build_class_map() {
    println!("cargo:rerun-if-changed=src/classes.txt");
    let mut out_file = BufWriter::new(
        File::create(Path::new(&env::var_os("OUT_DIR").unwrap()).join("classes_generated.rs"))
            .unwrap(),
    );

    let classes = std::fs::read_to_string("src/classes.txt").unwrap();
    let mut handled_entries: HashSet<String> = HashSet::new();
    let mut map_entries: Vec<(String, String)> = vec![];

    writeln!(&mut out_file, "#[allow(non_upper_case_globals)]").unwrap();
    writeln!(&mut out_file, "pub mod generated {{").unwrap();
    for line in classes.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: ClassEntry = serde_json::from_str(line).unwrap();
        let key = entry.name.to_lowercase();
        if !handled_entries.contains(&key) {
            handled_entries.insert(key.clone());

            writeln!(
                &mut out_file,
                "pub const {}: super::ClassInfo = super::ClassInfo {{ name: {:?}, kind: super::ClassKind::{}, placeable: {} }};",
                &entry.name,
                &entry.name,
                kind_variant(&entry.kind),
                entry.placeable
            )
            .unwrap();

            map_entries.push((key, entry.name));
        }
    }

    let mut map = phf_codegen::Map::new();
    for (key, const_name) in &map_entries {
        map.entry(key.as_str(), const_name);
    }

    write!(
        &mut out_file,
        "pub(super) static CLASS_MAP: phf::Map<&'static str, super::ClassInfo> = {};",
        map.build()
    )
    .unwrap();

    writeln!(&mut out_file, "}}").unwrap();
}

fn main() {
    build_class_map();
}
