use flowpack_container::CheckResult;
use flowpack_core::FlowpackConfig;
use flowpack_core::config::CONFIG_FILE;
use std::path::Path;

pub async fn doctor() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let (config, config_check) = match FlowpackConfig::load(project_dir) {
        Ok(config) if project_dir.join(CONFIG_FILE).exists() => {
            (config, CheckResult::ok("Found"))
        }
        Ok(config) => (config, CheckResult::ok("Not found, using defaults")),
        Err(e) => (
            FlowpackConfig::default(),
            CheckResult::fail(&e.to_string()),
        ),
    };

    let mut report = super::container_client(&config).doctor().await;
    report.config_file = config_check;

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed, see above for details");
    }

    Ok(())
}
