/// Dataset ingestion for the charging queue service.
///
/// The service consumes a single static export — there is no live feed and
/// no backfill. Submodules:
/// - `sessions` — parses the charging session CSV export.

pub mod sessions;
