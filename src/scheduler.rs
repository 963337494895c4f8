use std::time::Duration;

use crate::db::DbPool;
use crate::models::jar;

/// Background sweep that advances jars whose deadlines have passed. Page
/// loads run the same check lazily; the sweep covers jars nobody is looking
/// at.
pub fn spawn_scheduler(pool: DbPool) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let conn = match pool.get() {
                Ok(c) => c,
                Err(e) => {
                    log::error!("Scheduler: failed to get DB connection: {}", e);
                    continue;
                }
            };
            match jar::expire_deadlines(&conn) {
                Ok(0) => {}
                Ok(advanced) => log::info!("Scheduler: advanced {advanced} jar(s)"),
                Err(e) => log::error!("Scheduler: deadline sweep failed: {}", e),
            }
        }
    });
}
