// ==========================================
// 端到端流程测试
// ==========================================
// 测试目标: 文件导入 → 统计 → 求解 → 排程 → 报告
// 覆盖范围: 报告一致性、JSON 输出字段、取消、配置文件
// ==========================================

mod helpers;

use helpers::test_data_builder::{csv_fixture, schedulable};
use maintenance_planner::domain::types::ScheduledDay;
use maintenance_planner::{
    CancellationToken, MaintenanceOrchestrator, PlannerConfig, PlannerError, SolveStatus,
};
use std::io::Write;

fn sample_csv() -> tempfile::NamedTempFile {
    csv_fixture(&[
        "equipment_id,line,component,cost,failure_probability,risk_impact,labor_hours,utilization_pct,production_per_hour,unit_price",
        "EQ-01,L1,Pump,1800,0.91,3,6,0.82,120,4.5",
        "EQ-02,L1,Motor,2500,0.64,2,10,0.55,90,4.5",
        "EQ-03,L2,Bearing,900,0.35,1,4,0.30,150,3.0",
        "EQ-04,L2,Gearbox,3200,0.78,4,12,0.91,80,6.0",
        "EQ-05,L3,Valve,400,0.12,1,2,0.20,60,2.0",
        "EQ-06,L3,Compressor,2100,0.73,2,9,0.74,110,5.0",
    ])
}

#[test]
fn test_full_pipeline_from_csv() {
    let orchestrator = MaintenanceOrchestrator::new(PlannerConfig::default()).unwrap();
    let file = sample_csv();

    let report = orchestrator
        .run_file(file.path(), &CancellationToken::new())
        .unwrap();

    // (a) 统计
    assert_eq!(report.analysis_summary.total_equipment, 6);
    assert_eq!(report.analysis_summary.high_risk_count, 3);

    // (b) 全量表
    let decisions = &report.decisions;
    assert_eq!(decisions.solution_status, SolveStatus::Optimal);
    assert_eq!(decisions.units.len(), 6);
    assert!(decisions.total_cost <= 7000.0);
    for unit in &decisions.units {
        assert_eq!(unit.maintain, unit.scheduled_day.is_some());
        assert_eq!(unit.maintain, unit.expected_revenue_loss.is_some());
    }

    // (c) 维护表按顺序
    let orders: Vec<u32> = report
        .maintenance_schedule
        .iter()
        .filter_map(|u| u.maintenance_order)
        .collect();
    let expected: Vec<u32> = (1..=decisions.maintenance_count as u32).collect();
    assert_eq!(orders, expected);

    // (d) 排程
    let summary = &report.schedule.summary;
    assert_eq!(summary.maintenance_count, decisions.maintenance_count);
    assert_eq!(summary.total_optimized_risk, Some(decisions.total_optimized_risk));
    assert_eq!(summary.solution_status, Some(SolveStatus::Optimal));
    assert!((summary.total_maintenance_cost - decisions.total_cost).abs() < 1e-9);
    for entry in &report.schedule.entries {
        if let ScheduledDay::Day(label) = &entry.scheduled_day {
            assert!(entry.eligible_days.contains(label));
        }
    }
}

#[test]
fn test_report_serializes_with_contract_fields() {
    let orchestrator = MaintenanceOrchestrator::new(PlannerConfig::default()).unwrap();
    let records = vec![
        schedulable("EQ-1", 500.0, 0.3, 4.0, 0.2),
        schedulable("EQ-2", 1000.0, 0.9, 4.0, 0.2),
    ];

    let report = orchestrator.run(&records).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["run_id"].is_string());
    assert!(json["generated_at"].is_string());
    let unit = &json["decisions"]["units"][0];
    for key in [
        "equipment_id",
        "maintain",
        "decision",
        "optimized_risk",
        "maintenance_order",
        "scheduled_day",
        "expected_revenue_loss",
        "solution_status",
        "total_optimized_risk",
    ] {
        assert!(unit.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(unit["maintain"], 1);
    assert_eq!(json["schedule"]["summary"]["packing_strategy"], "greedy_in_order");
}

#[test]
fn test_config_file_drives_run() {
    let mut config_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        config_file,
        r#"{{
            "optimizer": {{ "budget": 600, "alpha": 0.0, "include_manpower_constraint": false }},
            "schedule": {{
                "days": [ {{ "label": "D1", "capacity_hours": 20 }}, {{ "label": "D2", "capacity_hours": 5 }},
                          {{ "label": "D3", "capacity_hours": 15 }}, {{ "label": "D4", "capacity_hours": 20 }} ],
                "defaults": {{ "production_per_hour": 10, "unit_price": 1 }}
            }}
        }}"#
    )
    .unwrap();

    let config = PlannerConfig::load_from_file(config_file.path()).unwrap();
    let orchestrator = MaintenanceOrchestrator::new(config).unwrap();
    let records = vec![
        schedulable("A", 1000.0, 0.9, 12.0, 0.8),
        schedulable("B", 500.0, 0.3, 12.0, 0.8),
    ];

    let report = orchestrator.run(&records).unwrap();

    assert!((report.decisions.total_optimized_risk - 0.9).abs() < 1e-12);
    assert_eq!(report.maintenance_schedule.len(), 1);
    assert_eq!(report.maintenance_schedule[0].equipment_id(), "B");
    let entry = report.schedule.entry("B").unwrap();
    assert_eq!(entry.scheduled_day.label(), Some("D3"));
    assert_eq!(report.schedule.remaining_hours("D3"), Some(3.0));
}

#[test]
fn test_cancelled_run_returns_error() {
    let orchestrator = MaintenanceOrchestrator::new(PlannerConfig::default()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = orchestrator.run_with_cancel(&[schedulable("EQ-1", 1.0, 0.5, 1.0, 0.1)], &token);
    assert!(matches!(result, Err(PlannerError::Cancelled { .. })));
}

#[test]
fn test_import_error_surfaces_through_pipeline() {
    let orchestrator = MaintenanceOrchestrator::new(PlannerConfig::default()).unwrap();
    let file = csv_fixture(&["equipment_id,cost", "EQ-1,10"]);

    let err = orchestrator
        .run_file(file.path(), &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, PlannerError::Import(_)));
    assert!(err.to_string().contains("failure_probability"));
}
