// ==========================================
// 设备维护排程系统 - 整次运行取消令牌
// ==========================================
// 粒度: 整次运行; 求解过程中周期性检查, 阶段之间检查
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可跨线程共享的取消令牌（克隆共享同一标志）
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
