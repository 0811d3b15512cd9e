//! Format detection and validation tests
//!
//! Covers the generation cascade, the error taxonomy, and the individual
//! structural rules of each generation.
mod common;
use common::*;
use flowdoc::error::IssueCode;
use flowdoc::model::EdgeMarker;
use flowdoc::prelude::*;
use flowdoc::schema::{looks_legacy, validate_full, validate_legacy, validate_partial};
use serde_json::json;

#[cfg(test)]
mod detection_tests {
    use super::*;

    #[test]
    fn test_full_document_is_detected_first() {
        let detected = validate(&full_document_json());

        assert!(matches!(detected, Detected::Full(_)));
        assert_eq!(detected.generation(), Some(Generation::Current));
        assert!(!detected.is_partial());
        assert_eq!(detected.node_count(), 4);
        assert_eq!(detected.edge_count(), 2);
    }

    #[test]
    fn test_partial_document_is_detected() {
        let detected = validate(&partial_document_json());

        assert!(matches!(detected, Detected::Partial(_)));
        assert!(detected.is_partial());
        assert_eq!(detected.node_count(), 4);
    }

    #[test]
    fn test_full_document_without_config_is_accepted_as_partial() {
        let mut value = full_document_json();
        value.as_object_mut().unwrap().remove("workflowConfig");

        let detected = validate(&value);
        assert!(matches!(detected, Detected::Partial(_)));
    }

    #[test]
    fn test_malformed_full_document_reports_full_schema_issues() {
        let mut value = full_document_json();
        value.as_object_mut().unwrap().remove("workflowConfig");
        value["nodes"][0]["data"]["type"] = json!("wizard");

        let Detected::Invalid(rejection) = validate(&value) else {
            panic!("document should be rejected");
        };
        assert_eq!(rejection.generation, Some(Generation::Current));
        let paths = issue_paths(&rejection.issues);
        assert!(paths.contains(&"workflowConfig"), "paths: {:?}", paths);
        assert!(paths.contains(&"nodes.0.data.type"), "paths: {:?}", paths);
    }

    #[test]
    fn test_invalid_config_is_never_downgraded_to_partial() {
        let mut value = full_document_json();
        value["workflowConfig"]["name"] = json!("");

        // The rest of the document is a valid partial, but it declares a config.
        assert!(validate_partial(&value).is_ok());

        let Detected::Invalid(rejection) = validate(&value) else {
            panic!("document should be rejected");
        };
        assert_eq!(rejection.generation, Some(Generation::Current));
        assert_eq!(issue_paths(&rejection.issues), vec!["workflowConfig.name"]);
        assert_eq!(rejection.issues[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_legacy_document_is_accepted_and_converted() {
        let detected = validate(&legacy_document_json());

        let Detected::Legacy(document) = &detected else {
            panic!("expected a legacy document, got {}", detected.summary());
        };
        assert_eq!(document.header.format_version, "1.0.0");
        assert_eq!(document.header.node_count, 3);
        assert_eq!(document.header.edge_count, 1);
        assert_eq!(document.workflow_config.name, "Legacy Flow");
        assert_eq!(detected.generation(), Some(Generation::Legacy));
    }

    #[test]
    fn test_summary_mentions_generation_and_counts() {
        let detected = validate(&full_document_json());
        assert_eq!(detected.summary(), "current document: 4 node(s), 2 edge(s)");
    }
}

#[cfg(test)]
mod error_taxonomy_tests {
    use super::*;

    #[test]
    fn test_text_that_is_not_json_is_invalid_json() {
        let error = validate_text("not json at all").unwrap_err();

        assert_eq!(error.code(), "invalid_json");
        assert!(error.issues().is_empty());
    }

    #[test]
    fn test_unrelated_object_fails_schema_validation() {
        let detected = validate(&json!({ "foo": "bar" }));
        assert!(!detected.is_valid());

        let Detected::Invalid(rejection) = detected else {
            unreachable!()
        };
        let error: ImportError = rejection.into();
        assert_eq!(error.code(), "schema_validation_failed");

        let paths = issue_paths(error.issues());
        for expected in ["header", "workflowConfig", "nodes", "edges"] {
            assert!(paths.contains(&expected), "missing {} in {:?}", expected, paths);
        }
    }

    #[test]
    fn test_non_object_root_is_unknown_format() {
        let Detected::Invalid(rejection) = validate(&json!([1, 2, 3])) else {
            panic!("array root should be rejected");
        };
        let error: ImportError = rejection.into();

        assert_eq!(error.code(), "unknown_format");
        assert_eq!(error.issues()[0].path, "");
        assert_eq!(error.issues()[0].message, "Expected object, received array");
    }

    #[test]
    fn test_legacy_shaped_failure_reports_legacy_issues() {
        let value = json!({ "id": "wf-1", "name": "Half a legacy doc" });
        assert!(looks_legacy(&value));

        let Detected::Invalid(rejection) = validate(&value) else {
            panic!("document should be rejected");
        };
        assert_eq!(rejection.generation, Some(Generation::Legacy));
        let paths = issue_paths(&rejection.issues);
        assert_eq!(paths, vec!["createdAt", "updatedAt", "nodes", "edges"]);
    }

    #[test]
    fn test_header_presence_disables_the_legacy_heuristic() {
        let value = json!({ "id": "wf-1", "name": "x", "header": {} });
        assert!(!looks_legacy(&value));

        let Detected::Invalid(rejection) = validate(&value) else {
            panic!("document should be rejected");
        };
        assert_eq!(rejection.generation, Some(Generation::Current));
    }
}

#[cfg(test)]
mod structural_rule_tests {
    use super::*;

    #[test]
    fn test_header_counts_must_match_arrays() {
        let mut value = full_document_json();
        value["header"]["nodeCount"] = json!(7);

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issue_paths(&issues), vec!["header.nodeCount"]);
        assert_eq!(issues[0].code, IssueCode::Custom);
    }

    #[test]
    fn test_header_literals_are_enforced() {
        let mut value = full_document_json();
        value["header"]["formatVersion"] = json!("0.9.0");
        value["header"]["exportedFrom"] = json!("someone-else");
        value["header"]["exportedAt"] = json!("yesterday");

        let issues = validate_full(&value).unwrap_err();
        let codes: Vec<_> = issues.iter().map(|i| (i.path.as_str(), i.code)).collect();
        assert_eq!(
            codes,
            vec![
                ("header.formatVersion", IssueCode::InvalidLiteral),
                ("header.exportedFrom", IssueCode::InvalidLiteral),
                ("header.exportedAt", IssueCode::InvalidString),
            ]
        );
    }

    #[test]
    fn test_zoom_range_is_enforced() {
        let mut value = full_document_json();
        value["viewport"]["zoom"] = json!(10);
        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issues[0].path, "viewport.zoom");
        assert_eq!(issues[0].code, IssueCode::TooBig);

        value["viewport"]["zoom"] = json!(0.01);
        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issues[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_viewport_is_optional() {
        let mut value = full_document_json();
        value.as_object_mut().unwrap().remove("viewport");
        assert!(validate_full(&value).unwrap().viewport.is_none());
    }

    #[test]
    fn test_child_nodes_require_rigid_containment() {
        let mut value = full_document_json();
        let agent = value["nodes"][1].as_object_mut().unwrap();
        assert_eq!(agent["parentId"], json!("group-1"));
        agent.remove("extent");
        agent.insert("expandParent".to_string(), json!(false));

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(
            issue_paths(&issues),
            vec!["nodes.1.extent", "nodes.1.expandParent"]
        );
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let mut value = full_document_json();
        value["nodes"][3]["id"] = json!("tool-1");
        value["edges"][1]["id"] = json!("e1");

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issue_paths(&issues), vec!["nodes.3.id", "edges.1.id"]);
        assert!(issues[0].message.contains("Duplicate node id"));
    }

    #[test]
    fn test_unknown_node_type_lists_the_options() {
        let mut value = full_document_json();
        value["nodes"][2]["data"]["type"] = json!("wizard");

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issues[0].path, "nodes.2.data.type");
        assert_eq!(issues[0].code, IssueCode::InvalidEnumValue);
        assert!(issues[0].message.contains("'humanInput'"));
        assert!(issues[0].message.contains("received 'wizard'"));
    }

    #[test]
    fn test_independent_problems_are_all_reported() {
        let mut value = full_document_json();
        value["nodes"][0]["position"]["x"] = json!("left");
        value["nodes"][2].as_object_mut().unwrap().remove("data");
        value["edges"][0]["source"] = json!("");

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(
            issue_paths(&issues),
            vec!["nodes.0.position.x", "nodes.2.data", "edges.0.source"]
        );
    }

    #[test]
    fn test_null_optional_fields_count_as_absent() {
        let mut value = full_document_json();
        value["nodes"][2]["style"] = json!(null);
        value["nodes"][2]["data"]["config"] = json!(null);
        value["edges"][0]["label"] = json!(null);

        let document = validate_full(&value).unwrap();
        assert!(document.nodes[2].style.is_none());
        assert!(document.nodes[2].data.config.is_empty());
    }

    #[test]
    fn test_partial_document_requires_a_node() {
        let mut value = partial_document_json();
        value["nodes"] = json!([]);
        value["edges"] = json!([]);
        value["header"]["nodeCount"] = json!(0);
        value["header"]["edgeCount"] = json!(0);

        let issues = validate_partial(&value).unwrap_err();
        assert_eq!(issues[0].path, "nodes");
        assert_eq!(issues[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_edge_marker_may_be_a_name_or_a_spec() {
        let mut value = full_document_json();
        value["edges"][0]["markerEnd"] = json!("arrow");
        value["edges"][1]["markerEnd"] = json!({ "type": "arrowclosed", "color": "#fff" });
        assert!(validate_full(&value).is_ok());

        value["edges"][1]["markerEnd"] = json!({ "color": "#fff" });
        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issues[0].path, "edges.1.markerEnd.type");
    }
}

#[cfg(test)]
mod decode_agreement_tests {
    use super::*;

    fn assert_located(issues: &[ValidationIssue]) {
        assert!(!issues.is_empty());
        for issue in issues {
            assert!(!issue.path.is_empty(), "issue without a path: {}", issue);
        }
    }

    #[test]
    fn test_edge_style_accepts_any_css_value() {
        let mut value = full_document_json();
        value["edges"][0]["style"] = json!({
            "stroke": "#000",
            "strokeWidth": "2",
            "strokeDasharray": 5,
            "opacity": 0.5
        });

        let document = validate_full(&value).unwrap();
        let style = document.edges[0].style.as_ref().unwrap();
        assert_eq!(style.stroke.as_deref(), Some("#000"));
        assert!(style.stroke_width.is_none());
        assert!(style.stroke_dasharray.is_none());
        assert_eq!(style.extra["strokeWidth"], json!("2"));
        assert_eq!(style.extra["strokeDasharray"], json!(5));

        // Mistyped named properties come back out under their original keys.
        let written = serde_json::to_value(style).unwrap();
        assert_eq!(written, value["edges"][0]["style"]);
    }

    #[test]
    fn test_edge_style_must_still_be_an_object() {
        let mut value = full_document_json();
        value["edges"][0]["style"] = json!("stroke: red");

        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issue_paths(&issues), vec!["edges.0.style"]);
    }

    #[test]
    fn test_fractional_z_index_is_accepted() {
        let mut value = full_document_json();
        value["edges"][0]["zIndex"] = json!(1.5);
        value["edges"][1]["zIndex"] = json!(-2);

        let document = validate_full(&value).unwrap();
        assert_eq!(document.edges[0].z_index, Some(1.5));
        assert_eq!(document.edges[1].z_index, Some(-2.0));

        value["edges"][0]["zIndex"] = json!("front");
        let issues = validate_full(&value).unwrap_err();
        assert_eq!(issue_paths(&issues), vec!["edges.0.zIndex"]);
    }

    #[test]
    fn test_marker_spec_fields_are_type_checked() {
        let mut value = full_document_json();
        value["edges"][1]["markerEnd"] = json!({
            "type": "arrowclosed",
            "color": 7,
            "width": "big",
            "height": 20
        });

        let issues = validate_full(&value).unwrap_err();
        assert_located(&issues);
        assert_eq!(
            issue_paths(&issues),
            vec!["edges.1.markerEnd.color", "edges.1.markerEnd.width"]
        );
    }

    #[test]
    fn test_marker_spec_extras_are_kept() {
        let mut value = full_document_json();
        value["edges"][1]["markerEnd"] = json!({
            "type": "arrowclosed",
            "orient": "auto-start-reverse",
            "strokeWidth": 2
        });

        let document = validate_full(&value).unwrap();
        let Some(EdgeMarker::Spec(marker)) = &document.edges[1].marker_end else {
            panic!("marker should decode as a spec");
        };
        assert_eq!(marker.marker_type, "arrowclosed");
        assert_eq!(marker.extra["orient"], json!("auto-start-reverse"));
        assert_eq!(
            serde_json::to_value(marker).unwrap(),
            value["edges"][1]["markerEnd"]
        );
    }

    #[test]
    fn test_legacy_top_level_type_is_checked_alongside_data_type() {
        let mut value = legacy_document_json();
        value["nodes"][1]["type"] = json!(7);

        let issues = validate_legacy(&value).unwrap_err();
        assert_located(&issues);
        assert_eq!(issue_paths(&issues), vec!["nodes.1.type"]);
        assert_eq!(issues[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_legacy_repo_and_component_must_be_text() {
        let mut value = legacy_document_json();
        value["nodes"][1]["data"]["repo"] = json!(5);
        value["nodes"][1]["data"]["componentId"] = json!({ "id": "c-1" });

        let issues = validate_legacy(&value).unwrap_err();
        assert_eq!(
            issue_paths(&issues),
            vec!["nodes.1.data.repo", "nodes.1.data.componentId"]
        );

        value["nodes"][1]["data"]["repo"] = json!("acme/tools");
        value["nodes"][1]["data"]["componentId"] = json!("c-1");
        let document = validate_legacy(&value).unwrap();
        let child = &document.nodes[1].data;
        assert_eq!(child.repo.as_deref(), Some("acme/tools"));
        assert_eq!(child.component_id.as_deref(), Some("c-1"));
        assert!(!child.extra.contains_key("repo"));
    }

    #[test]
    fn test_cascade_rejections_always_carry_paths() {
        let mut full = full_document_json();
        full["edges"][1]["markerEnd"] = json!({ "type": "arrow", "height": false });
        let mut legacy = legacy_document_json();
        legacy["nodes"][0]["data"]["repo"] = json!(["a", "b"]);

        for value in [full, legacy] {
            let Detected::Invalid(rejection) = validate(&value) else {
                panic!("document should be rejected");
            };
            assert_located(&rejection.issues);
        }
    }
}

#[cfg(test)]
mod legacy_rule_tests {
    use super::*;

    #[test]
    fn test_legacy_node_type_comes_from_data_first() {
        let mut value = legacy_document_json();
        value["nodes"][1]["type"] = json!("tool");

        let document = validate_legacy(&value).unwrap();
        assert_eq!(document.nodes[1].data.node_type, NodeType::Code);
    }

    #[test]
    fn test_legacy_node_without_any_type_is_rejected() {
        let mut value = legacy_document_json();
        value["nodes"][2].as_object_mut().unwrap().remove("type");

        let issues = validate_legacy(&value).unwrap_err();
        assert_eq!(issue_paths(&issues), vec!["nodes.2.data.type"]);
        assert_eq!(issues[0].message, "Required");
    }

    #[test]
    fn test_legacy_unknown_type_is_rejected() {
        let mut value = legacy_document_json();
        value["nodes"][0]["type"] = json!("wizard");

        let issues = validate_legacy(&value).unwrap_err();
        assert_eq!(issues[0].path, "nodes.0.type");
        assert_eq!(issues[0].code, IssueCode::InvalidEnumValue);
    }

    #[test]
    fn test_legacy_timestamps_accept_text_or_millis() {
        let mut value = legacy_document_json();
        value["createdAt"] = json!(true);

        let issues = validate_legacy(&value).unwrap_err();
        assert_eq!(issues[0].path, "createdAt");
        assert_eq!(issues[0].message, "Expected string or number, received boolean");
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;

    #[test]
    fn test_issue_formatting() {
        let issue = ValidationIssue::new("nodes.0.id", IssueCode::InvalidType, "Required");
        assert_eq!(IssueFormatter::format_issue(&issue), "nodes.0.id: Required [invalid_type]");

        let root = ValidationIssue::new("", IssueCode::InvalidType, "Expected object, received string");
        assert_eq!(
            root.to_string(),
            "(root): Expected object, received string [invalid_type]"
        );
    }

    #[test]
    fn test_report_lists_every_issue() {
        let error = validate_text(r#"{"foo":"bar"}"#)
            .map(|detected| match detected {
                Detected::Invalid(rejection) => ImportError::from(rejection),
                other => panic!("unexpected {}", other.summary()),
            })
            .unwrap();

        let report = ValidationReport::from_error(&error);
        assert_eq!(report.code, "schema_validation_failed");
        let rendered = report.to_string();
        assert_eq!(rendered.lines().count(), 1 + report.issues.len());
        assert!(rendered.contains("  - header: Required [invalid_type]"));
    }

    #[test]
    fn test_issue_code_serializes_as_snake_case() {
        let issue = ValidationIssue::new("viewport.zoom", IssueCode::TooBig, "too big");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["code"], json!("too_big"));
    }
}
