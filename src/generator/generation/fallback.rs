//! 回退链状态机
//!
//! 状态转移：`Pending → Trying(0) → {Success(i) | Trying(i+1)} → {Success(i) | AllFailed}`。
//! 不存在对同一候选重试的转移。

use serde::{Deserialize, Serialize};

/// 回退链的当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackState {
    Pending,
    Trying(usize),
    Success(usize),
    AllFailed,
}

/// 单个候选的尝试结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    Succeeded,
    /// 预算不足被跳过，不视为错误
    Skipped,
    Failed,
}

impl FallbackState {
    /// 开始尝试，空候选列表直接失败
    pub fn start(candidate_count: usize) -> Self {
        FallbackState::Pending.advance(None, candidate_count)
    }

    /// 根据当前候选的结果转移到下一个状态，终止状态保持不变
    pub fn advance(self, outcome: Option<CandidateOutcome>, candidate_count: usize) -> Self {
        match (self, outcome) {
            (FallbackState::Pending, _) => {
                if candidate_count == 0 {
                    FallbackState::AllFailed
                } else {
                    FallbackState::Trying(0)
                }
            }
            (FallbackState::Trying(i), Some(CandidateOutcome::Succeeded)) => {
                FallbackState::Success(i)
            }
            (FallbackState::Trying(i), Some(_)) => {
                if i + 1 < candidate_count {
                    FallbackState::Trying(i + 1)
                } else {
                    FallbackState::AllFailed
                }
            }
            (state, _) => state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FallbackState::Success(_) | FallbackState::AllFailed)
    }

    /// 正在尝试的候选下标
    pub fn current(&self) -> Option<usize> {
        match self {
            FallbackState::Trying(i) => Some(*i),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_fails_immediately() {
        assert_eq!(FallbackState::start(0), FallbackState::AllFailed);
    }

    #[test]
    fn test_success_stops_the_chain() {
        let state = FallbackState::start(3);
        assert_eq!(state, FallbackState::Trying(0));
        let state = state.advance(Some(CandidateOutcome::Failed), 3);
        assert_eq!(state, FallbackState::Trying(1));
        let state = state.advance(Some(CandidateOutcome::Succeeded), 3);
        assert_eq!(state, FallbackState::Success(1));
        assert!(state.is_terminal());
        assert_eq!(state.advance(Some(CandidateOutcome::Failed), 3), state);
    }

    #[test]
    fn test_every_candidate_visited_once_before_all_failed() {
        let mut state = FallbackState::start(4);
        let mut visited = Vec::new();
        while let Some(i) = state.current() {
            visited.push(i);
            let outcome = if i % 2 == 0 {
                CandidateOutcome::Failed
            } else {
                CandidateOutcome::Skipped
            };
            state = state.advance(Some(outcome), 4);
        }
        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(state, FallbackState::AllFailed);
    }
}
