//! 成本账本：按调用方累计花费并做预算检查
//!
//! 单次请求内的花费先记在 `CostSession` 中，请求成功后才提交到账本；
//! 请求失败或被取消时会话被丢弃，不写入任何花费。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BudgetExceeded;
use crate::llm::client::types::TokenUsage;

/// 预算检查结果
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetDecision {
    Allow,
    Deny(BudgetExceeded),
}

impl BudgetDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, BudgetDecision::Allow)
    }
}

/// 成本账本接口
pub trait CostLedger: Send + Sync {
    fn record_usage(&self, caller_id: &str, provider: &str, usage: &TokenUsage, cost: f64);

    /// 在已提交花费的基础上检查预估花费
    fn check_budget(&self, caller_id: &str, estimated_cost: f64) -> BudgetDecision;

    /// 调用方已提交的累计花费
    fn spent(&self, caller_id: &str) -> f64;
}

/// 单个调用方的累计数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallerSpend {
    pub total_cost: f64,
    pub total_tokens: usize,
    pub calls: u64,
    pub by_provider: HashMap<String, f64>,
}

/// 内存账本，同一调用方的并发记录不会丢失
pub struct InMemoryCostLedger {
    per_caller_limit: Option<f64>,
    spend: Mutex<HashMap<String, CallerSpend>>,
}

impl InMemoryCostLedger {
    pub fn new(per_caller_limit: Option<f64>) -> Self {
        Self {
            per_caller_limit,
            spend: Mutex::new(HashMap::new()),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// 调用方的累计数据快照
    pub fn snapshot(&self, caller_id: &str) -> CallerSpend {
        self.spend
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(caller_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl CostLedger for InMemoryCostLedger {
    fn record_usage(&self, caller_id: &str, provider: &str, usage: &TokenUsage, cost: f64) {
        let cost = cost.max(0.0);
        let mut spend = self
            .spend
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = spend.entry(caller_id.to_string()).or_default();
        entry.total_cost += cost;
        entry.total_tokens += usage.total_tokens;
        entry.calls += 1;
        *entry.by_provider.entry(provider.to_string()).or_default() += cost;
    }

    fn check_budget(&self, caller_id: &str, estimated_cost: f64) -> BudgetDecision {
        let Some(limit) = self.per_caller_limit else {
            return BudgetDecision::Allow;
        };
        let remaining = limit - self.spent(caller_id);
        if estimated_cost <= remaining {
            BudgetDecision::Allow
        } else {
            BudgetDecision::Deny(BudgetExceeded {
                caller_id: caller_id.to_string(),
                estimated_cost,
                remaining: remaining.max(0.0),
            })
        }
    }

    fn spent(&self, caller_id: &str) -> f64 {
        self.spend
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(caller_id)
            .map(|s| s.total_cost)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingCharge {
    provider: String,
    usage: TokenUsage,
    cost: f64,
}

/// 单次请求的成本会话
pub struct CostSession {
    ledger: Arc<dyn CostLedger>,
    caller_id: String,
    pending: Vec<PendingCharge>,
    committed: bool,
}

impl CostSession {
    pub fn new(ledger: Arc<dyn CostLedger>, caller_id: impl Into<String>) -> Self {
        Self {
            ledger,
            caller_id: caller_id.into(),
            pending: Vec::new(),
            committed: false,
        }
    }

    pub fn caller_id(&self) -> &str {
        &self.caller_id
    }

    /// 未提交的花费也计入预算
    pub fn check_budget(&self, estimated_cost: f64) -> BudgetDecision {
        self.ledger
            .check_budget(&self.caller_id, estimated_cost + self.pending_cost())
    }

    pub fn record(&mut self, provider: &str, usage: TokenUsage, cost: f64) {
        self.pending.push(PendingCharge {
            provider: provider.to_string(),
            usage,
            cost: cost.max(0.0),
        });
    }

    pub fn pending_cost(&self) -> f64 {
        self.pending.iter().map(|c| c.cost).sum()
    }

    pub fn pending_usage(&self) -> TokenUsage {
        self.pending
            .iter()
            .fold(TokenUsage::default(), |acc, c| acc + c.usage)
    }

    /// 提交全部花费，返回提交的总成本
    pub fn commit(mut self) -> f64 {
        let total = self.pending_cost();
        for charge in self.pending.drain(..) {
            self.ledger
                .record_usage(&self.caller_id, &charge.provider, &charge.usage, charge.cost);
        }
        self.committed = true;
        debug!(caller_id = %self.caller_id, cost = total, "Cost session committed");
        total
    }
}

impl Drop for CostSession {
    fn drop(&mut self) {
        if !self.committed && !self.pending.is_empty() {
            warn!(
                caller_id = %self.caller_id,
                discarded_cost = self.pending_cost(),
                "Cost session discarded without commit"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_denies_when_limit_would_be_exceeded() {
        let ledger = InMemoryCostLedger::new(Some(1.0));
        ledger.record_usage("acme", "openai", &TokenUsage::new(100, 100), 0.8);

        assert!(ledger.check_budget("acme", 0.2).is_allowed());
        match ledger.check_budget("acme", 0.5) {
            BudgetDecision::Deny(err) => {
                assert_eq!(err.caller_id, "acme");
                assert!((err.remaining - 0.2).abs() < 1e-9);
            }
            BudgetDecision::Allow => panic!("expected deny"),
        }
        assert!(ledger.check_budget("other", 0.9).is_allowed());
    }

    #[test]
    fn test_unlimited_ledger_always_allows() {
        let ledger = InMemoryCostLedger::unlimited();
        assert!(ledger.check_budget("acme", 1_000_000.0).is_allowed());
    }

    #[test]
    fn test_session_commits_only_on_success() {
        let ledger = Arc::new(InMemoryCostLedger::unlimited());

        let mut dropped = CostSession::new(ledger.clone(), "acme");
        dropped.record("openai", TokenUsage::new(10, 10), 0.5);
        drop(dropped);
        assert_eq!(ledger.spent("acme"), 0.0);

        let mut session = CostSession::new(ledger.clone(), "acme");
        session.record("openai", TokenUsage::new(10, 10), 0.5);
        session.record("anthropic", TokenUsage::new(5, 5), 0.25);
        assert_eq!(session.pending_usage().total_tokens, 30);
        assert!((session.commit() - 0.75).abs() < 1e-9);

        let snapshot = ledger.snapshot("acme");
        assert!((snapshot.total_cost - 0.75).abs() < 1e-9);
        assert_eq!(snapshot.calls, 2);
        assert_eq!(snapshot.by_provider.len(), 2);
    }

    #[test]
    fn test_session_budget_includes_pending_cost() {
        let ledger = Arc::new(InMemoryCostLedger::new(Some(1.0)));
        let mut session = CostSession::new(ledger, "acme");
        session.record("openai", TokenUsage::new(10, 10), 0.7);
        assert!(!session.check_budget(0.5).is_allowed());
        assert!(session.check_budget(0.3).is_allowed());
    }

    #[tokio::test]
    async fn test_concurrent_records_are_not_lost() {
        let ledger = Arc::new(InMemoryCostLedger::unlimited());
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger.record_usage("acme", "openai", &TokenUsage::new(1, 1), 0.01);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        let snapshot = ledger.snapshot("acme");
        assert_eq!(snapshot.calls, 50);
        assert!((snapshot.total_cost - 0.5).abs() < 1e-9);
    }
}
