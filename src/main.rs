//! Render the cloud provider config manifests for an install config

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cloud_provider_assets::asset::{Asset, Parents, WritableAsset};
use cloud_provider_assets::installconfig::{
    AzureCredentials, ClusterId, InstallConfig, PlatformCreds, PlatformCredsCheck,
};
use cloud_provider_assets::manifests::{CloudProviderConfig, ManifestPaths, MANIFEST_DIR};

/// Cloud provider config asset for the cluster installer
#[derive(Parser, Debug)]
#[command(name = "cloud-provider-assets", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the cloud provider config manifests into a directory
    Render(RenderArgs),
}

/// Render mode arguments
#[derive(Parser, Debug)]
struct RenderArgs {
    /// Path to the install config YAML
    #[arg(short = 'f', long = "install-config", env = "INSTALL_CONFIG")]
    install_config: PathBuf,

    /// Azure service principal JSON file
    ///
    /// Falls back to AZURE_* environment variables, then to
    /// ~/.azure/osServicePrincipal.json.
    #[arg(long, env = "AZURE_SERVICE_PRINCIPAL_FILE")]
    azure_credentials: Option<PathBuf>,

    /// Infra ID to use instead of generating one from the cluster name
    #[arg(long, env = "INFRA_ID")]
    infra_id: Option<String>,

    /// Install directory the manifests are written under
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Manifest directory, relative to the install directory
    #[arg(long, default_value = MANIFEST_DIR)]
    manifest_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => run_render(args),
    }
}

/// Resolve the inputs, run the credentials check and the asset, write files
fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let install_config = InstallConfig::from_file(&args.install_config)
        .with_context(|| format!("failed to load {}", args.install_config.display()))?;
    let creds = load_credentials(&install_config, args.azure_credentials.as_deref())?;
    let cluster_id = match args.infra_id {
        Some(infra_id) => ClusterId::new(infra_id),
        None => ClusterId::generate(install_config.cluster_name()),
    };
    info!(
        infra_id = %cluster_id.infra_id,
        cluster = %install_config.cluster_name(),
        "Resolved cluster ID"
    );

    let mut parents = Parents::new()
        .with(creds)
        .with(install_config)
        .with(cluster_id);

    let mut check = PlatformCredsCheck;
    check.generate(&parents)?;
    parents.insert(check);

    let mut asset = CloudProviderConfig::with_registry(
        Default::default(),
        ManifestPaths::new(&args.manifest_dir),
    );
    asset.generate(&parents)?;

    for file in asset.files() {
        let path = args.output_dir.join(&file.filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, &file.data)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(file = %path.display(), "Wrote manifest");
    }

    Ok(())
}

/// Credentials for the install config's platform
fn load_credentials(
    install_config: &InstallConfig,
    azure_file: Option<&std::path::Path>,
) -> anyhow::Result<PlatformCreds> {
    if install_config.azure().is_none() {
        return Ok(PlatformCreds::default());
    }

    let credentials = match azure_file {
        Some(path) => AzureCredentials::from_file(path)?,
        None => match AzureCredentials::from_env() {
            Some(credentials) => credentials,
            None => {
                let path = AzureCredentials::default_file()
                    .context("no Azure credentials in environment and HOME is not set")?;
                AzureCredentials::from_file(&path)?
            }
        },
    };
    Ok(PlatformCreds::azure(credentials))
}
