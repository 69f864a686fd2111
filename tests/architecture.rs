//! Architecture Verification Suite
//!
//! Keeps the pipeline pieces shareable across tasks and the storage and
//! classifier seams behind their traits.

#[cfg(test)]
mod architecture_tests {
    use dental_scan::classifier::{CallbackBridge, CallbackClassifier, Completion, DentalClassifier};
    use dental_scan::store::ScanRecordStore;
    use image::DynamicImage;

    struct NoopEngine;

    impl CallbackClassifier for NoopEngine {
        fn submit(&self, _image: DynamicImage, on_complete: Completion) {
            on_complete(Ok(Vec::new()));
        }
    }

    // 1. The orchestrator is shared behind Arc by the front end.
    #[test]
    fn test_pipeline_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<dental_scan::ClassificationOrchestrator>();
        assert_send_sync::<dental_scan::HistoryAggregator>();
        assert_send_sync::<dental_scan::scan::ConditionMapper>();
        assert_send_sync::<dental_scan::scan::FallbackPolicy>();
        assert_send_sync::<dental_scan::ScanResult>();
    }

    // 2. Adapters and stores cross await points and threads.
    #[test]
    fn test_adapters_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<dental_scan::classifier::HttpClassifier>();
        assert_send_sync::<dental_scan::classifier::UnavailableClassifier>();
        assert_send_sync::<CallbackBridge<NoopEngine>>();

        assert_send_sync::<dental_scan::store::InMemoryScanStore>();
        assert_send_sync::<dental_scan::store::SqliteScanStore>();
    }

    // 3. Seams: every adapter is usable through its trait object.
    #[test]
    fn test_trait_seams() {
        fn assert_classifier<T: DentalClassifier + 'static>() {}
        fn assert_store<T: ScanRecordStore + 'static>() {}

        assert_classifier::<dental_scan::classifier::HttpClassifier>();
        assert_classifier::<dental_scan::classifier::UnavailableClassifier>();
        assert_classifier::<CallbackBridge<NoopEngine>>();

        assert_store::<dental_scan::store::InMemoryScanStore>();
        assert_store::<dental_scan::store::SqliteScanStore>();
    }

    // 4. Errors surfaced to callers stay std errors so `?` into anyhow works.
    #[test]
    fn test_errors_are_std_errors() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}

        assert_error::<dental_scan::ClassifierError>();
        assert_error::<dental_scan::ScanError>();
    }
}
