use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = gilmat_api::Args::parse();

	gilmat_api::run(args).await
}
