pub mod acis;
pub mod outbox;
pub mod ses;
