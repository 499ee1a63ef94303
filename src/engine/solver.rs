// ==========================================
// 设备维护排程系统 - 0/1 选择求解器
// ==========================================
// 模型: max Σ v_i x_i
//       s.t. Σ cost_i x_i <= budget
//            Σ labor_i x_i <= labor_limit (可选)
//            x_i ∈ {0, 1}
// 方法: 深度优先分支定界, 上界取各约束维度分数松弛的最小值
// 红线: 只输出整数解, 不输出分数松弛解
// ==========================================
// 确定性: 候选顺序固定, 仅严格改进才替换当前最优解
// 超时: 返回已找到的最优可行解, 状态 NotSolved
// ==========================================

use crate::domain::types::SolveStatus;
use crate::engine::cancellation::CancellationToken;
use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// 改进判定容差
const IMPROVEMENT_EPS: f64 = 1e-9;

/// 每隔多少个节点检查一次时限与取消
const CHECK_INTERVAL: u64 = 1024;

// ==========================================
// 问题定义
// ==========================================

/// 单个二值变量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionItem {
    pub value: f64, // 选中收益（风险降低量）
    pub cost: f64,  // 费用消耗
    pub labor: f64, // 工时消耗
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionProblem {
    pub items: Vec<SelectionItem>,
    pub budget: f64,
    pub labor_limit: Option<f64>,
}

/// 求解统计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SolveStats {
    pub nodes_explored: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub selected: Vec<bool>, // 与 items 下标一一对应
    pub value: f64,          // Σ v_i x_i
    pub stats: SolveStats,
}

// ==========================================
// BinarySelectionSolver - 分支定界求解器
// ==========================================
pub struct BinarySelectionSolver {
    time_limit: Duration,
}

impl BinarySelectionSolver {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }

    /// 求解
    ///
    /// # 返回
    /// - Ok(SolveOutcome): 任意求解状态（含 Infeasible / NotSolved）
    /// - Err(Cancelled): 求解过程中收到取消信号, 不产出部分结果
    #[instrument(skip(self, problem, cancel), fields(
        items = problem.items.len(),
        budget = problem.budget,
        labor_limit = ?problem.labor_limit
    ))]
    pub fn solve(
        &self,
        problem: &SelectionProblem,
        cancel: Option<&CancellationToken>,
    ) -> PlannerResult<SolveOutcome> {
        let started = Instant::now();
        let n = problem.items.len();

        // 0 向量是唯一兜底解; 容量为负时连它也不可行
        let capacity_valid = problem.budget.is_finite()
            && problem.budget >= 0.0
            && problem.labor_limit.map_or(true, |l| l.is_finite() && l >= 0.0);
        if !capacity_valid {
            debug!("容量为负或非有限数, 问题不可行");
            return Ok(SolveOutcome {
                status: SolveStatus::Infeasible,
                selected: vec![false; n],
                value: 0.0,
                stats: SolveStats {
                    nodes_explored: 0,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                },
            });
        }

        if cancel.map_or(false, |c| c.is_cancelled()) {
            return Err(PlannerError::Cancelled {
                stage: "optimize".to_string(),
            });
        }

        let mut search = Search::new(problem, started.checked_add(self.time_limit), cancel);
        search.seed_greedy();
        search.branch(0, 0.0, 0.0, 0.0);

        if search.cancelled {
            return Err(PlannerError::Cancelled {
                stage: "optimize".to_string(),
            });
        }

        let status = if search.timed_out {
            SolveStatus::NotSolved
        } else {
            SolveStatus::Optimal
        };

        let mut selected = vec![false; n];
        for (pos, chosen) in search.best_selection.iter().enumerate() {
            if *chosen {
                selected[search.candidates[pos]] = true;
            }
        }

        let mut value = search.best_value;
        let dropped = trim_to_capacity(problem, &mut selected);
        if dropped > 0 {
            value = problem
                .items
                .iter()
                .zip(&selected)
                .filter(|(_, s)| **s)
                .map(|(item, _)| item.value)
                .sum();
            debug!(dropped, value, "按输入顺序复核容量, 剔除超限变量");
        }

        let stats = SolveStats {
            nodes_explored: search.nodes,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        debug!(
            status = %status,
            nodes = stats.nodes_explored,
            elapsed_ms = stats.elapsed_ms,
            best_value = value,
            "分支定界结束"
        );

        Ok(SolveOutcome {
            status,
            selected,
            value,
            stats,
        })
    }
}

// ==========================================
// 搜索状态
// ==========================================
struct Search<'a> {
    items: &'a [SelectionItem],
    budget: f64,
    labor_limit: Option<f64>,

    // 候选下标（按费用密度降序）; 收益为 0 或单项超容量的变量直接固定为 0
    candidates: Vec<usize>,
    // 工时上界使用的候选位置顺序（按工时密度降序）
    labor_order: Vec<usize>,

    current: Vec<bool>,
    best_selection: Vec<bool>,
    best_value: f64,

    deadline: Option<Instant>,
    cancel: Option<&'a CancellationToken>,
    nodes: u64,
    timed_out: bool,
    cancelled: bool,
}

impl<'a> Search<'a> {
    fn new(
        problem: &'a SelectionProblem,
        deadline: Option<Instant>,
        cancel: Option<&'a CancellationToken>,
    ) -> Self {
        let items = problem.items.as_slice();
        let labor_cap = problem.labor_limit.unwrap_or(f64::INFINITY);

        // 收益为 0 的变量不进入候选: 选与不选目标值相同, 同值时取"不维护"
        let mut candidates: Vec<usize> = (0..items.len())
            .filter(|&i| {
                let item = &items[i];
                item.value > 0.0 && item.cost <= problem.budget && item.labor <= labor_cap
            })
            .collect();
        candidates.sort_by(|&a, &b| {
            density(items[b].value, items[b].cost)
                .total_cmp(&density(items[a].value, items[a].cost))
                .then(a.cmp(&b))
        });

        let mut labor_order: Vec<usize> = (0..candidates.len()).collect();
        if problem.labor_limit.is_some() {
            labor_order.sort_by(|&a, &b| {
                let ia = &items[candidates[a]];
                let ib = &items[candidates[b]];
                density(ib.value, ib.labor)
                    .total_cmp(&density(ia.value, ia.labor))
                    .then(a.cmp(&b))
            });
        }

        let m = candidates.len();
        Self {
            items,
            budget: problem.budget,
            labor_limit: problem.labor_limit,
            candidates,
            labor_order,
            current: vec![false; m],
            best_selection: vec![false; m],
            best_value: 0.0,
            deadline,
            cancel,
            nodes: 0,
            timed_out: false,
            cancelled: false,
        }
    }

    fn item_at(&self, pos: usize) -> &SelectionItem {
        &self.items[self.candidates[pos]]
    }

    fn fits(&self, pos: usize, cost_used: f64, labor_used: f64) -> bool {
        let item = self.item_at(pos);
        cost_used + item.cost <= self.budget
            && self.labor_limit.map_or(true, |l| labor_used + item.labor <= l)
    }

    /// 按密度顺序贪心装入, 作为初始可行解
    fn seed_greedy(&mut self) {
        let mut cost_used = 0.0;
        let mut labor_used = 0.0;
        let mut value = 0.0;
        let mut selection = vec![false; self.candidates.len()];

        for (pos, chosen) in selection.iter_mut().enumerate() {
            if self.fits(pos, cost_used, labor_used) {
                let item = self.item_at(pos);
                cost_used += item.cost;
                labor_used += item.labor;
                value += item.value;
                *chosen = true;
            }
        }

        if value > self.best_value {
            self.best_value = value;
            self.best_selection = selection;
        }
    }

    /// 从 depth 起未决变量的分数松弛上界（两维取最小）
    fn upper_bound(&self, depth: usize, cost_used: f64, labor_used: f64) -> f64 {
        let by_cost = fractional_fill(
            (depth..self.candidates.len()).map(|pos| {
                let item = self.item_at(pos);
                (item.value, item.cost)
            }),
            self.budget - cost_used,
        );

        match self.labor_limit {
            None => by_cost,
            Some(limit) => {
                let by_labor = fractional_fill(
                    self.labor_order
                        .iter()
                        .filter(|&&pos| pos >= depth)
                        .map(|&pos| {
                            let item = self.item_at(pos);
                            (item.value, item.labor)
                        }),
                    limit - labor_used,
                );
                by_cost.min(by_labor)
            }
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.timed_out || self.cancelled {
            return true;
        }
        if self.nodes % CHECK_INTERVAL == 0 {
            if self.cancel.map_or(false, |c| c.is_cancelled()) {
                self.cancelled = true;
                return true;
            }
            if self.deadline.map_or(false, |d| Instant::now() >= d) {
                self.timed_out = true;
                return true;
            }
        }
        false
    }

    fn branch(&mut self, depth: usize, value: f64, cost_used: f64, labor_used: f64) {
        self.nodes += 1;
        if self.should_stop() {
            return;
        }

        // 当前部分解（其余变量取 0）本身可行
        if value > self.best_value + IMPROVEMENT_EPS {
            self.best_value = value;
            self.best_selection.clone_from(&self.current);
        }

        if depth == self.candidates.len() {
            return;
        }
        if value + self.upper_bound(depth, cost_used, labor_used) <= self.best_value + IMPROVEMENT_EPS {
            return;
        }

        // 先分支 x=1
        if self.fits(depth, cost_used, labor_used) {
            let item = *self.item_at(depth);
            self.current[depth] = true;
            self.branch(
                depth + 1,
                value + item.value,
                cost_used + item.cost,
                labor_used + item.labor,
            );
            self.current[depth] = false;
        }

        // 再分支 x=0
        self.branch(depth + 1, value, cost_used, labor_used);
    }
}

/// 按输入下标顺序复核容量
///
/// 搜索按密度顺序累加消耗, 浮点加法与顺序相关; 结果表按输入顺序汇总。
/// 超限时逐个剔除收益最小的已选变量（同值剔除下标靠后者）, 返回剔除个数。
fn trim_to_capacity(problem: &SelectionProblem, selected: &mut [bool]) -> usize {
    let mut dropped = 0;
    loop {
        let (cost_used, labor_used) = problem
            .items
            .iter()
            .zip(selected.iter())
            .filter(|(_, s)| **s)
            .fold((0.0, 0.0), |(c, l), (item, _)| (c + item.cost, l + item.labor));

        let within = cost_used <= problem.budget
            && problem.labor_limit.map_or(true, |limit| labor_used <= limit);
        if within {
            return dropped;
        }

        let weakest = (0..selected.len()).filter(|&i| selected[i]).min_by(|&a, &b| {
            problem.items[a]
                .value
                .total_cmp(&problem.items[b].value)
                .then(b.cmp(&a))
        });
        match weakest {
            Some(idx) => {
                selected[idx] = false;
                dropped += 1;
            }
            None => return dropped,
        }
    }
}

/// 收益/消耗 密度; 零消耗视为无穷大
fn density(value: f64, weight: f64) -> f64 {
    if weight <= 0.0 {
        f64::INFINITY
    } else {
        value / weight
    }
}

/// 分数背包装填（输入须已按密度降序）
fn fractional_fill<I>(items: I, capacity: f64) -> f64
where
    I: Iterator<Item = (f64, f64)>,
{
    let mut remaining = capacity;
    let mut total = 0.0;
    for (value, weight) in items {
        if weight <= remaining {
            total += value;
            remaining -= weight;
        } else {
            if weight > 0.0 && remaining > 0.0 {
                total += value * remaining / weight;
            }
            break;
        }
    }
    total
}
