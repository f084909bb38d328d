use biomint::Chain;

/// Version banner plus the chains this build can open sessions against.
pub fn execute() {
    println!("biomint {}", env!("CARGO_PKG_VERSION"));
    println!("{}", supported_chains());
}

fn supported_chains() -> String {
    let chains: Vec<String> = Chain::ALL
        .iter()
        .map(|chain| format!("{} ({})", chain, chain.registry_code()))
        .collect();
    format!("chains: {}", chains.join(", "))
}
