use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

/// Offset of the client's clock. Calendar days (streaks, export dates, today's entry) are
/// evaluated in this offset.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct LocalTime {
    /// Minutes east of UTC, e.g. `120` for CEST. Defaults to UTC.
    #[param(example = 120)]
    utc_offset_minutes: Option<i32>,
}

impl LocalTime {
    pub(crate) fn offset(&self) -> FixedOffset {
        let utc = Utc.fix();
        let Some(minutes) = self.utc_offset_minutes else {
            return utc;
        };
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::debug!(%minutes, "ignoring invalid utc offset");
                utc
            })
    }

    pub(crate) fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset())
    }
}
