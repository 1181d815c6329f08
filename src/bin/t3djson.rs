use t3d_tools::T3dFile;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();

    match args[1].as_str() {
        "dump" => {
            let mut file = std::fs::File::open(&args[2])?;
            let t3d = T3dFile::new(&mut file)?;

            println!("{}", serde_json::to_string_pretty(&t3d)?);
        }
        "rebuild" => {
            let in_file = std::fs::File::open(&args[2])?;
            let t3d: T3dFile = serde_json::from_reader(in_file)?;

            let mut out_file = std::fs::File::create("out.t3d")?;
            t3d.save(&mut out_file)?;
        }

        unhandled => panic!("unhandled option: {unhandled}"),
    }

    Ok(())
}
