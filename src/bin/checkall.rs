use std::path::PathBuf;

use rayon::prelude::*;
use t3d_tools::T3dFile;
use walkdir::WalkDir;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();

    let root = PathBuf::from(&args[1]);
    let mut files: Vec<PathBuf> = vec![];
    for file in WalkDir::new(root) {
        let file = file?;

        if file.file_type().is_file()
            && file
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("t3d"))
        {
            files.push(file.path().to_path_buf());
        }
    }

    let failures: Vec<_> = files
        .par_iter()
        .filter_map(|path| {
            let result = std::fs::File::open(path)
                .map_err(anyhow::Error::from)
                .and_then(|mut file| T3dFile::new(&mut file));

            match result {
                Ok(t3d) => {
                    println!("ok      {} ({} objects)", path.display(), t3d.objects.len());
                    None
                }
                Err(error) => Some((path, error)),
            }
        })
        .collect();

    for (path, error) in &failures {
        println!("FAILED  {}: {:#}", path.display(), error);
    }

    if !failures.is_empty() {
        anyhow::bail!("{} of {} files failed to parse", failures.len(), files.len());
    }

    Ok(())
}
