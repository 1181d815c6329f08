use t3d_tools::T3dFile;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();

    let mut file = std::fs::File::open(&args[1])?;
    let t3d = T3dFile::new(&mut file)?;

    for object in &t3d.objects {
        println!("{:#?}", object.properties);
        println!("{:#?}", object.vector_properties);
    }

    Ok(())
}
