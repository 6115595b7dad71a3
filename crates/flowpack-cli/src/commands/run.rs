use flowpack_container::find_available_port;
use flowpack_core::FlowpackConfig;
use std::path::PathBuf;

pub async fn run(
    image: &str,
    name: Option<String>,
    port: Option<u16>,
    json: bool,
) -> anyhow::Result<()> {
    let config = FlowpackConfig::load(&PathBuf::from("."))?;
    let host_port = match port {
        Some(port) => port,
        None => find_available_port(config.ports.start, config.ports.max)?,
    };
    let container_name = name.as_deref().unwrap_or(image);

    let result = super::container_client(&config)
        .run(image, container_name, host_port)
        .await;

    if json {
        super::print_json(&result)?;
    } else if let Some(info) = &result.info {
        println!("Container: {} ({})", info.container_name, info.container_id);
        println!("URL: {}", info.url);
    }

    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}
