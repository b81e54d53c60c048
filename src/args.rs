use clap::{Parser, Subcommand};

/// Kubernetes operator converging worker fleets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct OperatorArgs {
    /// Configuration file, the extension is optional
    #[arg(short, long, default_value = "worker-fleet-operator")]
    pub config: String,
    #[clap(subcommand)]
    pub subcommand: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch WorkerFleet resources and converge them (default)
    Run,
    /// Print the WorkerFleet CustomResourceDefinition
    Crd,
}
