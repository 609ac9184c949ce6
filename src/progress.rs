//! # 进度回报模块
//!
//! 调用方可以传入一个进度接收器，在隐写或提取过程中按固定间隔收到
//! `[0, 1]` 区间内单调不减的完成比例。成功返回之前一定会收到一次 `1.0`。
//! 接收器返回 `ControlFlow::Break(())` 即可中止当前操作。

use std::ops::ControlFlow;

use crate::constants::PROGRESS_INTERVAL_BITS;
use crate::error::{Result, StegoError};

/// 进度接收器。
pub trait ProgressSink {
    /// 接收当前完成比例，返回 `Break` 表示请求中止。
    fn report(&mut self, fraction: f64) -> ControlFlow<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(f64) -> ControlFlow<()>,
{
    fn report(&mut self, fraction: f64) -> ControlFlow<()> {
        self(fraction)
    }
}

/// 忽略所有进度的接收器。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// 把“已处理比特数”换算成节流后的单调进度，并把中止请求转成错误。
pub(crate) struct Tracker<'a, P: ProgressSink + ?Sized> {
    sink: &'a mut P,
    total: u64,
    next_report: u64,
    last: f64,
}

impl<'a, P: ProgressSink + ?Sized> Tracker<'a, P> {
    pub(crate) fn new(sink: &'a mut P, total: u64) -> Self {
        Self {
            sink,
            total,
            next_report: PROGRESS_INTERVAL_BITS as u64,
            last: 0.0,
        }
    }

    /// 记录已处理 `done` 个比特，距上次回报不足一个间隔时什么也不做。
    pub(crate) fn update(&mut self, done: u64) -> Result<()> {
        if done < self.next_report {
            return Ok(());
        }
        self.next_report = done + PROGRESS_INTERVAL_BITS as u64;

        let fraction = if self.total == 0 {
            0.0
        } else {
            done as f64 / self.total as f64
        };
        self.emit(fraction)
    }

    pub(crate) fn finish(&mut self) -> Result<()> {
        self.emit(1.0)
    }

    fn emit(&mut self, fraction: f64) -> Result<()> {
        let fraction = fraction.clamp(0.0, 1.0).max(self.last);
        self.last = fraction;

        match self.sink.report(fraction) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(StegoError::Cancelled),
        }
    }
}
