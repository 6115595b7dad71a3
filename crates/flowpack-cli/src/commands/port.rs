use flowpack_core::FlowpackConfig;
use std::path::PathBuf;

pub fn port(start: Option<u16>, max: Option<u16>) -> anyhow::Result<()> {
    let config = FlowpackConfig::load(&PathBuf::from("."))?;
    let start = start.unwrap_or(config.ports.start);
    let max = max.unwrap_or(config.ports.max);

    let port = flowpack_container::find_available_port(start, max)?;
    println!("{port}");
    Ok(())
}
