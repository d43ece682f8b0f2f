//! Algorithm listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings

use cepstra_core::{ParamDescriptor, PortSpec};
use cepstra_extractor::LowLevelExtractor;
use cepstra_registry::AlgorithmRegistry;
use clap::Args;

#[derive(Args)]
pub struct AlgorithmsArgs {
    /// Show ports and parameters of one algorithm (e.g. MFCC)
    #[arg(value_name = "ALGORITHM")]
    algorithm: Option<String>,
}

pub fn run(args: AlgorithmsArgs) -> anyhow::Result<()> {
    let registry = AlgorithmRegistry::new();

    let Some(wanted) = &args.algorithm else {
        println!("Available Algorithms");
        println!("====================");
        println!();
        println!("  {:18}  {:14}  {}", "Id", "Category", "Description");
        println!("  {:18}  {:14}  {}", "--", "--------", "-----------");
        for desc in registry.all() {
            println!(
                "  {:18}  {:14}  {}",
                desc.id,
                desc.category.name(),
                desc.description
            );
        }
        println!();
        println!("Run 'cepstra algorithms <ID>' for ports and parameters.");
        return Ok(());
    };

    if wanted.eq_ignore_ascii_case("LowLevelExtractor") {
        let extractor = LowLevelExtractor::new(&registry)?;
        println!("LowLevelExtractor");
        println!("=================");
        println!();
        println!("Composite of every algorithm above, used by 'cepstra extract'.");
        println!();
        print_parameters(extractor.parameter_specs());
        return Ok(());
    }

    let desc = registry
        .all()
        .into_iter()
        .find(|d| d.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| anyhow::anyhow!("Unknown algorithm: {}", wanted))?;
    let algorithm = registry
        .create(desc.kind)
        .ok_or_else(|| anyhow::anyhow!("Algorithm {} is not registered", desc.id))?;

    println!("{}", desc.id);
    println!("{}", "=".repeat(desc.id.len()));
    println!();
    println!("{}", desc.description);
    println!();
    print_ports("Inputs", algorithm.inputs());
    print_ports("Outputs", algorithm.outputs());
    print_parameters(algorithm.parameters());
    Ok(())
}

fn print_ports(title: &str, ports: &[PortSpec]) {
    println!("{title}:");
    for port in ports {
        println!(
            "  {:18}  {:8}  {}",
            port.name,
            format!("{:?}", port.port_type),
            port.description
        );
    }
    println!();
}

fn print_parameters(params: &[ParamDescriptor]) {
    if params.is_empty() {
        println!("Parameters: none");
        return;
    }
    println!("Parameters:");
    println!();
    println!("  {:20}  {:12}  {:16}  {}", "Name", "Default", "Range", "Description");
    println!("  {:20}  {:12}  {:16}  {}", "----", "-------", "-----", "-----------");
    for param in params {
        println!(
            "  {:20}  {:12}  {:16}  {}",
            param.name,
            param.default.to_string(),
            param.range.to_string(),
            param.description
        );
    }
}
