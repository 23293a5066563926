use relay_bridge_config::BridgeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schemars::schema_for!(BridgeConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);

    Ok(())
}
