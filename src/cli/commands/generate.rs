use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::samples::{create_sample_files, sample_row_count};

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory to write the sample files into
    #[arg(long, value_name = "DIR", default_value = "./csv_files")]
    pub dir: PathBuf,

    /// Number of sample files to create
    #[arg(long, default_value_t = 10)]
    pub count: usize,
}

pub async fn execute(args: GenerateArgs, quiet: bool) -> Result<()> {
    let output = Output::new(false, quiet);

    output.info(&format!("Creating {} sample files...", args.count));
    let paths = create_sample_files(&args.dir, args.count)?;

    for (index, path) in paths.iter().enumerate() {
        output.key_value(
            &format!("{}", path.display()),
            &format!("{} rows", sample_row_count(index + 1)),
            false,
        );
    }
    output.success(&format!(
        "Created {} files in {}",
        paths.len(),
        args.dir.display()
    ));

    Ok(())
}
