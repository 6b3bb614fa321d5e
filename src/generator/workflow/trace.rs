//! 流水线遥测：类型化的观察者接口与随响应返回的结构化轨迹

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::types::quality::ReadinessLevel;
use crate::types::routing::{Complexity, RoutingStrategy};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validate,
    Cache,
    Classify,
    Route,
    Research,
    Generate,
    Adapt,
    Assess,
    Refine,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validate => "validate",
            PipelineStage::Cache => "cache",
            PipelineStage::Classify => "classify",
            PipelineStage::Route => "route",
            PipelineStage::Research => "research",
            PipelineStage::Generate => "generate",
            PipelineStage::Adapt => "adapt",
            PipelineStage::Assess => "assess",
            PipelineStage::Refine => "refine",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 流水线事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    Started {
        caller_id: String,
    },
    CacheHit {
        fingerprint: String,
    },
    Classified {
        complexity: Complexity,
        strategy: RoutingStrategy,
        estimated_tokens: u32,
    },
    Routed {
        selections: usize,
        estimated_cost: f64,
        /// 是否经过成本优化截断
        optimized: bool,
    },
    ResearchGathered {
        items: usize,
        failures: usize,
        confidence: f64,
    },
    ResearchSkipped {
        reason: String,
    },
    Generated {
        iteration: usize,
        provider: String,
        model: String,
        attempts: usize,
    },
    Adapted {
        iteration: usize,
        changes: usize,
        cultural_score: f64,
    },
    Assessed {
        iteration: usize,
        overall: f64,
        readiness: ReadinessLevel,
    },
    RefinementStopped {
        iteration: usize,
        reason: String,
    },
    Completed {
        overall: f64,
        flagged: bool,
        total_cost: f64,
    },
}

/// 观察者接口，事件同步回调
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// 把事件写入tracing日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RefinementStopped { iteration, reason } => {
                info!(iteration, reason = %reason, "Refinement stopped")
            }
            PipelineEvent::ResearchSkipped { reason } => {
                warn!(reason = %reason, "Research skipped")
            }
            PipelineEvent::Completed {
                overall,
                flagged,
                total_cost,
            } => info!(overall, flagged, total_cost, "Pipeline completed"),
            other => debug!(event = ?other, "Pipeline event"),
        }
    }
}

/// 收集所有事件，测试中断言使用
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// 阶段耗时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: PipelineStage,
    pub duration_ms: u64,
}

/// 随响应返回的轨迹
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineTrace {
    pub events: Vec<PipelineEvent>,
    pub stage_timings: Vec<StageTiming>,
    pub total_ms: u64,
}

impl PipelineTrace {
    /// 同一阶段多次执行时累加
    pub fn stage_duration(&self, stage: PipelineStage) -> Option<Duration> {
        let total: u64 = self
            .stage_timings
            .iter()
            .filter(|t| t.stage == stage)
            .map(|t| t.duration_ms)
            .sum();
        self.stage_timings
            .iter()
            .any(|t| t.stage == stage)
            .then(|| Duration::from_millis(total))
    }

    pub fn has_event(&self, predicate: impl Fn(&PipelineEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<PipelineStage, Instant>,
    phase_durations: Vec<StageTiming>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, stage: PipelineStage) {
        self.phase_start_times.insert(stage, Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, stage: PipelineStage) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(&stage)?;
        let duration = start_time.elapsed();
        self.phase_durations.push(StageTiming {
            stage,
            duration_ms: duration.as_millis() as u64,
        });
        Some(duration)
    }

    /// 获取总执行时间
    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.total_duration().as_secs_f64()
        );
        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for timing in &self.phase_durations {
                report.push_str(&format!(
                    "- {}: {:.3}秒\n",
                    timing.stage,
                    timing.duration_ms as f64 / 1000.0
                ));
            }
        }
        report
    }

    /// 结束计时，写入轨迹
    pub fn finish(self, trace: &mut PipelineTrace) {
        trace.total_ms = self.total_duration().as_millis() as u64;
        trace.stage_timings = self.phase_durations;
    }
}
