// ==========================================
// 设备维护排程系统 - 命令行入口
// ==========================================
// 子命令:
// - plan: 导入 → 统计 → 求解 → 排程 → 输出报告
// - analyze: 导入 → 本地统计
// Ctrl-C 触发整次运行取消, 不输出部分排程
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use maintenance_planner::{
    logging, AnalysisEngine, AnalysisSummary, CancellationToken, EquipmentImporter,
    MaintenanceOrchestrator, PackingStrategy, PlanReport, PlannerConfig, APP_NAME, VERSION,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "maintenance-planner",
    about = "设备维护预算优化与日工时排程",
    version,
    propagate_version = true
)]
struct Cli {
    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 求解维护计划并排程
    Plan {
        /// 设备清单 (.csv / .xlsx / .xls)
        #[arg(short, long)]
        input: PathBuf,
        /// JSON 配置文件（缺省使用内置默认值）
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// 覆盖配置中的预算
        #[arg(short, long)]
        budget: Option<f64>,
        /// 覆盖配置中的装箱策略 (greedy_in_order / tightest_fit)
        #[arg(long)]
        strategy: Option<PackingStrategy>,
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// 输出文件（缺省输出到 stdout）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 仅输出设备清单的本地统计
    Analyze {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    info!(version = VERSION, "{} 启动", APP_NAME);

    match cli.command {
        Commands::Plan {
            input,
            config,
            budget,
            strategy,
            format,
            output,
        } => {
            let config = build_config(config, budget, strategy)?;
            let report = run_plan(input, config).await?;
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Text => render_plan(&report)?,
            };
            emit(&rendered, output.as_ref())
        }
        Commands::Analyze { input, format } => {
            let records = EquipmentImporter::new()
                .load(&input)
                .with_context(|| format!("导入失败: {}", input.display()))?;
            let summary = AnalysisEngine::new().analyze(&records);
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
                OutputFormat::Text => render_analysis(&summary)?,
            };
            emit(&rendered, None)
        }
    }
}

fn build_config(
    path: Option<PathBuf>,
    budget: Option<f64>,
    strategy: Option<PackingStrategy>,
) -> anyhow::Result<PlannerConfig> {
    let mut config = match path {
        Some(path) => PlannerConfig::load_from_file(&path)?,
        None => {
            let mut config = PlannerConfig::default();
            config.apply_env_overrides()?;
            config
        }
    };
    if let Some(budget) = budget {
        config.optimizer.budget = budget;
    }
    if let Some(strategy) = strategy {
        config.schedule.packing_strategy = strategy;
    }
    Ok(config)
}

/// 在阻塞线程上执行流程, Ctrl-C 时取消
async fn run_plan(input: PathBuf, config: PlannerConfig) -> anyhow::Result<PlanReport> {
    let orchestrator = MaintenanceOrchestrator::new(config)?;
    let token = CancellationToken::new();
    let worker_token = token.clone();

    let mut handle =
        tokio::task::spawn_blocking(move || orchestrator.run_file(&input, &worker_token));

    let report = tokio::select! {
        joined = &mut handle => joined??,
        _ = tokio::signal::ctrl_c() => {
            warn!("收到中断信号, 正在取消运行");
            token.cancel();
            handle.await??
        }
    };
    Ok(report)
}

fn emit(rendered: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("写入输出文件失败: {}", path.display()))?;
            info!(path = %path.display(), "报告已写入");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn render_analysis(summary: &AnalysisSummary) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "设备总数:         {}", summary.total_equipment)?;
    writeln!(out, "平均故障概率:     {:.4}", summary.avg_failure_probability)?;
    writeln!(out, "高风险设备 (>0.7): {}", summary.high_risk_count)?;
    writeln!(out, "未优化总风险:     {:.4}", summary.total_unoptimized_risk)?;
    Ok(out)
}

fn render_plan(report: &PlanReport) -> anyhow::Result<String> {
    let mut out = String::new();
    let decisions = &report.decisions;
    let summary = &report.schedule.summary;

    writeln!(out, "运行编号: {}", report.run_id)?;
    writeln!(out, "生成时间: {}", report.generated_at.to_rfc3339())?;
    writeln!(out)?;
    writeln!(out, "== 本地统计 ==")?;
    out.push_str(&render_analysis(&report.analysis_summary)?);
    writeln!(out)?;
    writeln!(out, "== 维护决策 ==")?;
    writeln!(out, "求解状态:     {}", decisions.solution_status)?;
    writeln!(out, "维护设备数:   {}", decisions.maintenance_count)?;
    writeln!(out, "维护费用合计: {:.2}", decisions.total_cost)?;
    writeln!(out, "优化后总风险: {:.4}", decisions.total_optimized_risk)?;
    writeln!(out, "风险降低:     {:.4}", decisions.risk_reduction)?;
    writeln!(
        out,
        "搜索节点:     {} ({} ms)",
        decisions.solve_stats.nodes_explored, decisions.solve_stats.elapsed_ms
    )?;
    writeln!(out)?;
    writeln!(out, "== 日工时排程 ({}) ==", summary.packing_strategy.title_cn())?;
    for entry in &report.schedule.entries {
        writeln!(
            out,
            "{:>3}. {:<16} {:<12} 工时 {:>6.1}  收入损失 {:>10.2}",
            entry.maintenance_order,
            entry.equipment_id,
            entry.scheduled_day.to_string(),
            entry.labor_hours,
            entry.expected_revenue_loss
        )?;
    }
    writeln!(out)?;
    for day in &summary.labor_remaining_per_day {
        writeln!(
            out,
            "{:<8} 剩余工时 {:>6.1} / {:.1}",
            day.day, day.remaining_hours, day.capacity_hours
        )?;
    }
    writeln!(
        out,
        "已落位 {} 台, 未落位 {} 台, 预计收入损失合计 {:.2}",
        summary.assigned_count, summary.unassigned_count, summary.total_revenue_loss
    )?;
    Ok(out)
}
