//! One upload-and-predict pass: raw export → normalized → derived features → matrix → labels.
//!
//! A pass either returns the full labeled table or an error; nothing partial escapes.

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::features::{derive_features, encode_protocol, FeatureMatrix};
use crate::frame::{Column, Frame};
use crate::ingest::normalize;
use crate::model::{check_contract, ArtifactRegistry, Artifacts};
use crate::report::LabelSummary;
use crate::sensor::{SensorStrategy, SensorVariant};
use std::sync::Arc;
use std::time::Instant;

pub const PREDICTED_COLUMN: &str = "predicted_mitre";

/// Labeled table plus its summary.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Input columns (sorted, typed, protocol encoded), derived features, `predicted_mitre`
    pub table: Frame,
    pub summary: LabelSummary,
}

pub struct Pipeline {
    strategy: Box<dyn SensorStrategy>,
    artifacts: Arc<Artifacts>,
}

impl Pipeline {
    pub fn new(strategy: Box<dyn SensorStrategy>, artifacts: Arc<Artifacts>) -> Self {
        Self {
            strategy,
            artifacts,
        }
    }

    /// Pipeline for `variant` with artifacts from the registry (loaded on first use).
    pub fn for_variant(variant: SensorVariant, config: &AppConfig, registry: &ArtifactRegistry) -> Result<Self> {
        let artifacts = registry.get(variant)?;
        Ok(Self::new(variant.strategy(config), artifacts))
    }

    pub fn variant(&self) -> SensorVariant {
        self.strategy.variant()
    }

    /// Everything up to the classifier: the augmented table and the matrix built from it.
    pub fn prepare(&self, raw: Frame) -> Result<(Frame, FeatureMatrix)> {
        let strategy = self.strategy.as_ref();
        let table = normalize(raw, strategy)?;
        let derived = derive_features(&table, strategy)?;

        let mut frame = table.into_frame();
        derived.attach(&mut frame);
        encode_protocol(&mut frame, &self.artifacts.protocol_encoder)?;

        let matrix = FeatureMatrix::build(&frame, strategy.drop_columns())?;
        Ok((frame, matrix))
    }

    pub fn run(&self, raw: Frame) -> Result<Prediction> {
        let start = Instant::now();
        let (mut table, matrix) = self.prepare(raw)?;

        let classifier = self.artifacts.classifier.as_ref();
        check_contract(classifier, &matrix)?;
        let labels = classifier.predict(&matrix)?;
        if labels.len() != matrix.rows() {
            return Err(PipelineError::PredictionCount {
                expected: matrix.rows(),
                got: labels.len(),
            });
        }

        let summary = LabelSummary::from_labels(&labels);
        table.set(PREDICTED_COLUMN, Column::Label(labels));

        tracing::info!(
            sensor = %self.variant(),
            rows = table.len(),
            features = matrix.width(),
            techniques = summary.counts.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "prediction complete"
        );
        Ok(Prediction { table, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_csv;
    use crate::model::{CategoryEncoder, Classifier};

    /// Labels each row by its encoded protocol.
    struct ByProtocol;

    impl Classifier for ByProtocol {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>> {
            let proto = features.column("protocol").unwrap_or_default();
            Ok(proto.iter().map(|&p| format!("T{}", 1000 + p as i64)).collect())
        }
    }

    fn pipeline(variant: SensorVariant) -> Pipeline {
        let artifacts = Arc::new(Artifacts {
            classifier: Box::new(ByProtocol),
            protocol_encoder: CategoryEncoder::new(["ICMP", "TCP", "UDP"]),
        });
        Pipeline::new(variant.strategy(&AppConfig::default()), artifacts)
    }

    #[test]
    fn snort_matrix_excludes_identifier_columns() {
        let raw = read_csv(
            "timestamp,src_ip,dst_ip,src_port,dst_port,protocol,msg,mitre,ttl\n\
             10/05-12:00:00.100000,1.1.1.1,2.2.2.2,5000,80,TCP,probe,T1046,64\n"
                .as_bytes(),
        )
        .unwrap();
        let (_, matrix) = pipeline(SensorVariant::Snort).prepare(raw).unwrap();
        assert_eq!(
            matrix.columns(),
            &["src_port", "dst_port", "protocol", "ttl", "time_diff", "pkt_rate_1s", "same_dst_port", "diff_src_port"]
        );
        assert_eq!(matrix.row(0), &[5000.0, 80.0, 1.0, 64.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn run_appends_predictions_and_summary() {
        let raw = read_csv(
            "timestamp,src_ip,dst_ip,src_port,dst_port,protocol,gid,sid,rev,message,classification,priority,mitre\n\
             2025-01-15T10:00:00.5Z,1.1.1.1,2.2.2.2,,53,UDP,1,2,3,m,c,2,T1\n\
             2025-01-15T10:00:00.1Z,1.1.1.1,2.2.2.2,4000,53,ICMP,1,2,3,m,c,2,T1\n"
                .as_bytes(),
        )
        .unwrap();
        let p = pipeline(SensorVariant::Suricata).run(raw).unwrap();
        let names = p.table.names();
        assert_eq!(names.last().map(String::as_str), Some(PREDICTED_COLUMN));
        match p.table.get(PREDICTED_COLUMN) {
            Some(Column::Label(l)) => assert_eq!(l, &["T1000", "T1002"]),
            other => panic!("unexpected column: {other:?}"),
        }
        assert_eq!(p.summary.total, 2);
        // null src_port stays null in the table; only the matrix zero-fills it
        assert!(p.table.numbers("src_port").unwrap()[1].is_null());
    }

    #[test]
    fn unseen_protocol_fails_whole_batch() {
        let raw = read_csv(
            "timestamp,src_ip,dst_ip,src_port,dst_port,protocol\n\
             10/05-12:00:00.1,1.1.1.1,2.2.2.2,1,80,TCP\n\
             10/05-12:00:00.2,1.1.1.1,2.2.2.2,1,80,SCTP\n"
                .as_bytes(),
        )
        .unwrap();
        let err = pipeline(SensorVariant::Snort).run(raw).unwrap_err();
        assert!(matches!(err, PipelineError::UnseenCategory { ref values, .. } if values == &["SCTP"]));
    }

    #[test]
    fn column_contract_is_enforced() {
        struct Strict(Vec<String>);
        impl Classifier for Strict {
            fn predict(&self, f: &FeatureMatrix) -> Result<Vec<String>> {
                Ok(vec![String::new(); f.rows()])
            }
            fn expected_columns(&self) -> Option<&[String]> {
                Some(&self.0)
            }
        }
        let artifacts = Arc::new(Artifacts {
            classifier: Box::new(Strict(vec!["src_port".into()])),
            protocol_encoder: CategoryEncoder::new(["TCP"]),
        });
        let p = Pipeline::new(SensorVariant::Snort.strategy(&AppConfig::default()), artifacts);
        let raw = read_csv(
            "timestamp,src_ip,dst_ip,src_port,dst_port,protocol\n10/05-12:00:00.1,a,b,1,2,TCP\n".as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            p.run(raw),
            Err(PipelineError::ShapeMismatch { expected: 1, got: 7 })
        ));
    }
}
