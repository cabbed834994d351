use std::path::PathBuf;

pub struct FmtArgs {
    pub path: PathBuf,
}

pub fn run(args: FmtArgs) {
    eprintln!(
        "error: cannot format `{}`: formatting is not available in this build",
        args.path.display()
    );
    std::process::exit(1);
}
