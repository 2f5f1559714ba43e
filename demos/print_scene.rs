use b3d::Scene;
use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

fn print_scene(path: &Path) {
    println!("{}", path.display());

    match Scene::from_path(path) {
        Ok(scene) => println!("{}", scene),
        Err(e) => println!("error: {}\n", e),
    }
}

/// Prints every .b3d file found under the directory given as the first argument, `demos/b3d_files` by default.
/// Run with `RUST_LOG=debug` to see each chunk as it is decoded.
pub fn main() {
    env_logger::init();

    let dir = match env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(
            env::var_os("CARGO_MANIFEST_DIR").expect("could not find cargo manifest dir"),
        )
        .join("demos/b3d_files"),
    };

    for entry in WalkDir::new(&dir).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let is_b3d = entry
            .path()
            .extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| ext.eq_ignore_ascii_case("b3d"));

        if entry.file_type().is_file() && is_b3d {
            print_scene(entry.path());
        }
    }
}
