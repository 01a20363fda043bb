use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = gilmat_eval::Args::parse();

	gilmat_eval::run(args).await
}
