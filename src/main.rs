// ==========================================
// 智能库存预警分析系统 - 命令行入口
// ==========================================
// 用法:
//   inventory-alert [data_dir] [--config path] [--locale zh-CN|en] [--log-json]
//
// 分析结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use inventory_alert::{i18n, logging, ConfigManager, DashboardApi};

struct CliArgs {
    data_dir: String,
    config_path: Option<String>,
    locale: Option<String>,
    log_json: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut cli = CliArgs {
        data_dir: ".".to_string(),
        config_path: None,
        locale: None,
        log_json: false,
    };
    let mut positional = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => cli.config_path = Some(args.next().context("--config 缺少路径参数")?),
            "--locale" => cli.locale = Some(args.next().context("--locale 缺少语言参数")?),
            "--log-json" => cli.log_json = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            value => {
                if positional.replace(value.to_string()).is_some() {
                    bail!("只能指定一个数据目录");
                }
            }
        }
    }
    if let Some(dir) = positional {
        cli.data_dir = dir;
    }
    Ok(cli)
}

fn main() -> Result<()> {
    let cli = parse_args()?;

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    if let Some(locale) = &cli.locale {
        i18n::set_locale(locale);
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", inventory_alert::APP_NAME, inventory_alert::VERSION);
    tracing::info!("==================================================");

    let manager = match &cli.config_path {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path))?,
        None => ConfigManager::load_default().context("加载默认配置失败")?,
    };

    let api = DashboardApi::from_config_manager(&cli.data_dir, &manager)
        .with_context(|| format!("初始化看板失败: {}", cli.data_dir))?;

    // 整次运行使用同一参考时间
    let now = chrono::Local::now().naive_local();
    let report = api.analyze(now).context("分析执行失败")?;

    for warning in &report.warnings {
        tracing::warn!(table = %warning.table, "{}", warning.message());
    }
    tracing::info!(
        run_id = %report.run_id,
        batches = report.batches.len(),
        used_sample_data = report.used_sample_data(),
        "分析完成"
    );

    let json = serde_json::to_string_pretty(report.as_ref()).context("分析结果序列化失败")?;
    println!("{}", json);
    Ok(())
}
