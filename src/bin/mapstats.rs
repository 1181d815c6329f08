use std::collections::BTreeMap;

use anyhow::Context;
use t3d_tools::{ClassKind, T3dFile, T3dObject};

fn count_polygons(object: &T3dObject, polygons: &mut usize, vertices: &mut usize) {
    if object.class.eq_ignore_ascii_case("Polygon") {
        *polygons += 1;
        *vertices += object
            .vector_properties
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("Vertex"))
            .count();
    }
    for child in &object.children {
        count_polygons(child, polygons, vertices);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();

    let mut file = std::fs::File::open(&args[1])?;
    let t3d = T3dFile::new(&mut file)?;
    let map = t3d.map_object().context("no Map object in file")?;

    let mut kind_counts: BTreeMap<ClassKind, usize> = BTreeMap::new();
    let mut unknown: BTreeMap<String, usize> = BTreeMap::new();
    let mut placeable = 0;
    for actor in t3d.actors() {
        match actor.class_info() {
            Some(info) => {
                *kind_counts.entry(info.kind()).or_default() += 1;
                if info.placeable() {
                    placeable += 1;
                }
            }
            None => {
                let class = actor.text_property("Class").unwrap_or(&actor.class);
                *unknown.entry(class.to_string()).or_default() += 1;
            }
        }
    }

    let mut polygons = 0;
    let mut vertices = 0;
    count_polygons(map, &mut polygons, &mut vertices);

    println!("{} actors ({} placeable)", t3d.actors().count(), placeable);
    for (kind, count) in &kind_counts {
        println!("  {:?}: {}", kind, count);
    }
    for (class, count) in &unknown {
        println!("  {} (not in registry): {}", class, count);
    }
    println!("{} polygons, {} vertices", polygons, vertices);

    Ok(())
}
