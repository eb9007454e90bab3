use anyhow::Result;
use robot_order_submit::utils::logging;
use robot_order_submit::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    if let Some(log_file) = &config.output_log_file {
        logging::init_log_file(log_file)?;
    }
    logging::init(config.output_log_file.as_deref());

    // 初始化并运行应用
    let result = match App::initialize(config).await {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };
    if let Err(e) = &result {
        error!("❌ 运行失败: {}", e);
    }
    result?;

    Ok(())
}
