//! Metrics aggregator
//!
//! 把回复汇总为 NPS 指标和按天的趋势序列。

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;
use ts_rs::TS;

use crate::errors::{Result, SurveyError};
use crate::storage::{DailyScoreRow, ResponseFilter, SeaOrmStorage, SurveyResponse};

/// NPS 分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "types.generated.ts")]
#[serde(rename_all = "lowercase")]
pub enum NpsBand {
    Promoter,
    Passive,
    Detractor,
}

impl NpsBand {
    /// 9-10 推荐者，7-8 被动者，0-6 贬损者
    pub fn classify(score: u8) -> Self {
        match score {
            9..=10 => NpsBand::Promoter,
            7..=8 => NpsBand::Passive,
            _ => NpsBand::Detractor,
        }
    }
}

/// 分档计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NpsTally {
    pub promoters: u64,
    pub passives: u64,
    pub detractors: u64,
}

impl NpsTally {
    pub fn record(&mut self, score: u8) {
        self.record_n(score, 1);
    }

    /// 一次计入 n 条同分回复
    pub fn record_n(&mut self, score: u8, n: u64) {
        match NpsBand::classify(score) {
            NpsBand::Promoter => self.promoters += n,
            NpsBand::Passive => self.passives += n,
            NpsBand::Detractor => self.detractors += n,
        }
    }

    pub fn total(&self) -> u64 {
        self.promoters + self.passives + self.detractors
    }

    /// ((promoters - detractors) / total) * 100，无回复时为 0
    pub fn nps_score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.promoters as f64 - self.detractors as f64) / total as f64 * 100.0
    }
}

/// 趋势中的单日数据
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "types.generated.ts")]
pub struct TrendPoint {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub nps_score: f64,
}

/// 按天的 NPS 趋势
///
/// 只包含有回复的日期，按日期升序。`iter()` 惰性计算每一天的分数，
/// 可以重复调用，每次都从头开始。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trend {
    days: BTreeMap<NaiveDate, NpsTally>,
}

impl Trend {
    pub fn record(&mut self, date: NaiveDate, score: u8) {
        self.record_n(date, score, 1);
    }

    pub fn record_n(&mut self, date: NaiveDate, score: u8, n: u64) {
        self.days.entry(date).or_default().record_n(score, n);
    }

    pub fn iter(&self) -> impl Iterator<Item = TrendPoint> + '_ {
        self.days.iter().map(|(date, tally)| TrendPoint {
            date: *date,
            nps_score: tally.nps_score(),
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> IntoIterator for &'a Trend {
    type Item = TrendPoint;
    type IntoIter = Box<dyn Iterator<Item = TrendPoint> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// NPS 汇总结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpsSummary {
    pub total_responses: u64,
    pub promoters: u64,
    pub passives: u64,
    pub detractors: u64,
    pub nps_score: f64,
    pub trend: Trend,
}

impl NpsSummary {
    /// 对已过滤的回复做纯计算
    pub fn from_responses<'a, I>(responses: I) -> Self
    where
        I: IntoIterator<Item = &'a SurveyResponse>,
    {
        let mut tally = NpsTally::default();
        let mut trend = Trend::default();

        for response in responses {
            tally.record(response.score);
            trend.record(response.submitted_at.date_naive(), response.score);
        }

        Self::from_parts(tally, trend)
    }

    /// 由数据库分组计数构建，结果与 `from_responses` 一致
    pub fn from_daily_counts(rows: &[DailyScoreRow]) -> Result<Self> {
        let mut tally = NpsTally::default();
        let mut trend = Trend::default();

        for row in rows {
            let date = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d").map_err(|e| {
                SurveyError::database_operation(format!("无效的统计日期 '{}': {}", row.day, e))
            })?;
            let score = u8::try_from(row.score)
                .ok()
                .filter(|s| *s <= 10)
                .ok_or_else(|| {
                    SurveyError::database_operation(format!("无效的存储分数: {}", row.score))
                })?;
            let count = u64::try_from(row.count).map_err(|_| {
                SurveyError::database_operation(format!("无效的计数: {}", row.count))
            })?;

            tally.record_n(score, count);
            trend.record_n(date, score, count);
        }

        Ok(Self::from_parts(tally, trend))
    }

    fn from_parts(tally: NpsTally, trend: Trend) -> Self {
        Self {
            total_responses: tally.total(),
            promoters: tally.promoters,
            passives: tally.passives,
            detractors: tally.detractors,
            nps_score: tally.nps_score(),
            trend,
        }
    }
}

pub struct MetricsAggregator {
    storage: Arc<SeaOrmStorage>,
}

impl MetricsAggregator {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn summarize(&self, filter: &ResponseFilter) -> Result<NpsSummary> {
        let rows = self.storage.daily_score_counts(filter).await?;
        let summary = NpsSummary::from_daily_counts(&rows)?;

        debug!(
            "MetricsAggregator: {} responses, nps={:.2}, {} trend days",
            summary.total_responses,
            summary.nps_score,
            summary.trend.len()
        );
        Ok(summary)
    }
}
