use binwatch_core::contract::BinStatusRecord;

/// Write side of the status table: one put per ingest invocation.
pub trait StatusStore {
    fn put_status(&self, record: &BinStatusRecord) -> Result<(), String>;
}

/// Read side of the status table for the query functions.
pub trait StatusQuery {
    fn latest_for_device(&self, device_id: &str) -> Result<Option<BinStatusRecord>, String>;

    /// Every record for one device, or the whole table when no device
    /// is given.
    fn load_records(&self, device_id: Option<&str>) -> Result<Vec<BinStatusRecord>, String>;
}
