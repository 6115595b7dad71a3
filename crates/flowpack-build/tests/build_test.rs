use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use flowpack_build::archive::{ARCHIVE_SUFFIX, archive_path, create_archive, extract_archive};
use flowpack_build::bundle::{BundleGenerator, GenerateError, TemplateVars, bundle_dir};
use flowpack_build::eject::{EjectError, eject_templates, ejected_template_dir};
use flowpack_build::template::{self, TEMPLATES, TemplateError, TemplateStore};
use flowpack_core::{ErrorKind, Flow};
use tempfile::TempDir;

const EXPECTED_FILES: &[&str] = &[
    "Dockerfile",
    "README.md",
    "app/flow.py",
    "app/main.py",
    "requirements.txt",
];

fn sample_flow() -> Flow {
    Flow::new("a1b2c3", "Support Bot")
        .with_description("Answers support tickets")
        .with_data(r#"{"data": {"nodes": [{"id": "ChatInput-1"}, {"id": "ChatOutput-2"}], "edges": [{"source": "ChatInput-1", "target": "ChatOutput-2"}]}}"#)
}

/// Relative path → contents for every file under `root`.
fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                out.insert(relative, std::fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn generate(flow: &Flow, root: &Path) -> PathBuf {
    let store = TemplateStore::embedded();
    BundleGenerator::new(&store).generate(flow, root).unwrap()
}

// ── Template Store Tests ──

#[test]
fn embedded_store_has_every_template() {
    let store = TemplateStore::embedded();
    for name in store.names() {
        assert!(!store.get(name).unwrap().is_empty(), "{name} is empty");
    }
    assert_eq!(store.names().count(), 5);
}

#[test]
fn unknown_template_is_not_found() {
    let store = TemplateStore::embedded();
    let err = store.get("docker-compose").unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(ref name) if name == "docker-compose"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn override_dir_replaces_matching_templates_only() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("requirements.txt.tera"),
        "fastapi==0.115.0\n",
    )
    .unwrap();

    let store = TemplateStore::with_override_dir(tmp.path()).unwrap();
    assert_eq!(store.get(template::MANIFEST).unwrap(), "fastapi==0.115.0\n");
    assert_eq!(
        store.get(template::CONTAINER_DEFINITION).unwrap(),
        TemplateStore::embedded()
            .get(template::CONTAINER_DEFINITION)
            .unwrap()
    );
}

#[test]
fn missing_override_dir_falls_back_to_embedded() {
    let tmp = TempDir::new().unwrap();
    let store = TemplateStore::with_override_dir(&tmp.path().join("nope")).unwrap();
    assert!(store.get(template::ENTRYPOINT).unwrap().contains("FastAPI"));
}

// ── Bundle Generation Tests ──

#[test]
fn generate_creates_expected_files() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());

    assert_eq!(bundle, tmp.path().join("support_bot_flow_app"));
    assert_eq!(bundle, bundle_dir(tmp.path(), &sample_flow()));

    let tree = read_tree(&bundle);
    let names: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(names, EXPECTED_FILES);
    for (name, contents) in &tree {
        assert!(!contents.is_empty(), "{name} is empty");
    }
}

#[test]
fn generate_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let a = generate(&sample_flow(), first.path());
    let b = generate(&sample_flow(), second.path());

    assert_eq!(read_tree(&a), read_tree(&b));
}

#[test]
fn generate_with_empty_payload_embeds_empty_graph() {
    let tmp = TempDir::new().unwrap();
    let flow = Flow::new("1", "Test Flow");

    let bundle = generate(&flow, tmp.path());

    assert!(bundle.ends_with("test_flow_flow_app"));
    let loader = std::fs::read_to_string(bundle.join("app/flow.py")).unwrap();
    assert!(loader.contains(r#"FLOW_DATA: Dict[str, Any] = json.loads("{}")"#));
}

#[test]
fn generate_with_blank_payload_embeds_empty_graph() {
    let tmp = TempDir::new().unwrap();
    let flow = Flow::new("1", "Test Flow").with_data("   ");

    let bundle = generate(&flow, tmp.path());

    let loader = std::fs::read_to_string(bundle.join("app/flow.py")).unwrap();
    assert!(loader.contains(r#"json.loads("{}")"#));
}

#[test]
fn loader_embeds_payload_as_quoted_literal() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());

    let loader = std::fs::read_to_string(bundle.join("app/flow.py")).unwrap();
    let line = loader
        .lines()
        .find(|l| l.starts_with("FLOW_DATA"))
        .unwrap();
    let literal = line
        .strip_prefix("FLOW_DATA: Dict[str, Any] = json.loads(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap();

    // The literal decodes back to exactly the stored payload.
    let decoded: String = serde_json::from_str(literal).unwrap();
    assert_eq!(decoded, sample_flow().data.unwrap());
}

#[test]
fn quotes_in_names_do_not_break_generated_source() {
    let tmp = TempDir::new().unwrap();
    let flow = Flow::new("id\"1", "Bob's \"quoted\" flow")
        .with_description("line one\nline \"two\"")
        .with_data(r#"{"note": "triple ''' and \"\"\" quotes"}"#);

    let bundle = generate(&flow, tmp.path());

    let loader = std::fs::read_to_string(bundle.join("app/flow.py")).unwrap();
    assert!(loader.contains(r#"FLOW_NAME = "Bob's \"quoted\" flow""#));
    assert!(loader.contains(r#"FLOW_ID = "id\"1""#));

    let main = std::fs::read_to_string(bundle.join("app/main.py")).unwrap();
    assert!(main.contains(r#"FLOW_DESCRIPTION = "line one\nline \"two\"""#));
}

#[test]
fn names_with_triple_quotes_and_backslashes_stay_in_literals() {
    let names = [r#"Ends with """ quotes"#, r"Path C:\Nodes flow"];

    for (i, name) in names.into_iter().enumerate() {
        let tmp = TempDir::new().unwrap();
        let flow = Flow::new(format!("id-{i}"), name);
        let bundle = generate(&flow, tmp.path());

        for file in ["app/main.py", "app/flow.py"] {
            let source = std::fs::read_to_string(bundle.join(file)).unwrap();
            let docstring = source.lines().next().unwrap();
            assert!(docstring.starts_with(r#"""""#), "{file}: {docstring}");
            assert!(!docstring.contains(name), "{file}: {docstring}");
            // The raw name never appears unescaped in generated source.
            assert!(!source.contains(name), "{file} embeds {name:?} unquoted");
        }

        let loader = std::fs::read_to_string(bundle.join("app/flow.py")).unwrap();
        let literal = serde_json::Value::String(name.to_owned()).to_string();
        assert!(loader.contains(&format!("FLOW_NAME = {literal}")));
    }
}

#[test]
fn dockerfile_labels_escape_variable_expansion() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&Flow::new("$ID", "Cost $HOME"), tmp.path());

    let dockerfile = std::fs::read_to_string(bundle.join("Dockerfile")).unwrap();
    assert!(dockerfile.contains(r#"LABEL org.opencontainers.image.title="Cost \$HOME""#));
    assert!(dockerfile.contains(r#"LABEL flowpack.flow-id="\$ID""#));
}

#[test]
fn readme_uses_name_and_default_description() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&Flow::new("9", "Test Flow"), tmp.path());

    let readme = std::fs::read_to_string(bundle.join("README.md")).unwrap();
    assert!(readme.starts_with("# Test Flow API"));
    assert!(readme.contains(flowpack_core::flow::DEFAULT_DESCRIPTION));
    assert!(readme.contains("docker build -t test_flow ."));
}

#[test]
fn dockerfile_references_generated_files() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());

    let dockerfile = std::fs::read_to_string(bundle.join("Dockerfile")).unwrap();
    assert!(dockerfile.contains("COPY requirements.txt ."));
    assert!(dockerfile.contains("pip install --no-cache-dir -r requirements.txt"));
    assert!(dockerfile.contains("COPY app/ ./app/"));
    assert!(dockerfile.contains("\"app.main:app\""));
    assert!(dockerfile.contains("EXPOSE 8000"));
    assert!(bundle.join("requirements.txt").exists());
    assert!(bundle.join("app/main.py").exists());
}

#[test]
fn generate_replaces_previous_bundle() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());
    std::fs::write(bundle.join("stale.txt"), "old").unwrap();

    let bundle = generate(&sample_flow(), tmp.path());

    assert!(!bundle.join("stale.txt").exists());
    assert!(bundle.join("app/main.py").exists());
}

#[test]
fn malformed_payload_is_validation_error() {
    let tmp = TempDir::new().unwrap();
    let flow = Flow::new("1", "Broken").with_data("{\"nodes\": [");

    let store = TemplateStore::embedded();
    let err = BundleGenerator::new(&store)
        .generate(&flow, tmp.path())
        .unwrap_err();

    assert!(matches!(err, GenerateError::InvalidFlow { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!bundle_dir(tmp.path(), &flow).exists());
}

#[test]
fn empty_name_is_validation_error() {
    let store = TemplateStore::embedded();
    let err = TemplateVars::from_flow(&Flow::new("1", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let tmp = TempDir::new().unwrap();
    let err = BundleGenerator::new(&store)
        .generate(&Flow::new("", "named"), tmp.path())
        .unwrap_err();
    assert!(err.to_string().contains("id"));
}

#[test]
fn missing_template_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let mut store = TemplateStore::embedded();
    store.remove(template::README);

    let err = BundleGenerator::new(&store)
        .generate(&sample_flow(), tmp.path())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("readme"));
    assert!(!bundle_dir(tmp.path(), &sample_flow()).exists());
}

#[test]
fn broken_template_syntax_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let mut store = TemplateStore::embedded();
    store.insert(template::MANIFEST, "{{ undefined_variable }}");

    let err = BundleGenerator::new(&store)
        .generate(&sample_flow(), tmp.path())
        .unwrap_err();

    assert!(matches!(err, GenerateError::Render { ref template, .. } if template == "manifest"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn unwritable_output_root_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("file-not-dir");
    std::fs::write(&blocker, "x").unwrap();

    let store = TemplateStore::embedded();
    let err = BundleGenerator::new(&store)
        .generate(&sample_flow(), &blocker)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
}

// ── Archive Tests ──

#[test]
fn archive_is_named_after_bundle() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());

    let zip = create_archive(&bundle).unwrap();

    assert_eq!(zip, archive_path(&bundle).unwrap());
    assert_eq!(
        zip.file_name().unwrap().to_string_lossy(),
        format!("support_bot_flow_app{ARCHIVE_SUFFIX}")
    );
    assert!(zip.exists());
}

#[test]
fn archive_round_trip_reproduces_bundle() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), &tmp.path().join("out"));
    let zip = create_archive(&bundle).unwrap();

    let dest = tmp.path().join("extracted");
    let extracted = extract_archive(&zip, &dest).unwrap();
    assert_eq!(extracted.len(), EXPECTED_FILES.len());

    // Entries are rooted one level above the bundle directory.
    let restored = dest.join("support_bot_flow_app");
    assert_eq!(read_tree(&restored), read_tree(&bundle));
}

#[test]
fn archive_entries_are_identical_across_runs() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), tmp.path());

    let first = std::fs::read(create_archive(&bundle).unwrap()).unwrap();
    let second = std::fs::read(create_archive(&bundle).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn archive_with_trailing_separator_lands_next_to_bundle() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), &tmp.path().join("out"));
    let with_slash = PathBuf::from(format!("{}/", bundle.display()));

    let first = create_archive(&with_slash).unwrap();
    let second = create_archive(&with_slash).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, tmp.path().join("out/support_bot_flow_app.zip"));
    assert!(!bundle.join(ARCHIVE_SUFFIX).exists());

    let dest = tmp.path().join("extracted");
    let extracted = extract_archive(&second, &dest).unwrap();
    assert_eq!(extracted.len(), EXPECTED_FILES.len());
    assert_eq!(read_tree(&dest.join("support_bot_flow_app")), read_tree(&bundle));
}

#[test]
fn archive_skips_stray_archive_inside_bundle() {
    let tmp = TempDir::new().unwrap();
    let bundle = generate(&sample_flow(), &tmp.path().join("out"));
    std::fs::write(bundle.join(ARCHIVE_SUFFIX), b"leftover").unwrap();

    let zip = create_archive(&bundle).unwrap();
    let dest = tmp.path().join("extracted");
    let extracted = extract_archive(&zip, &dest).unwrap();

    // The stray file is ordinary bundle content, not the archive itself.
    assert_eq!(extracted.len(), EXPECTED_FILES.len() + 1);
    assert_ne!(zip, bundle.join(ARCHIVE_SUFFIX));
}

#[test]
fn archive_path_without_name_is_rejected() {
    let err = archive_path(Path::new("/")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn archive_missing_bundle_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = create_archive(&tmp.path().join("absent_flow_app")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("absent_flow_app"));
}

// ── Eject Tests ──

#[test]
fn eject_writes_every_template() {
    let tmp = TempDir::new().unwrap();
    assert!(ejected_template_dir(tmp.path()).is_none());

    let dir = eject_templates(tmp.path()).unwrap();

    assert_eq!(dir, tmp.path().join(".flowpack/templates"));
    assert_eq!(ejected_template_dir(tmp.path()), Some(dir.clone()));
    for tpl in TEMPLATES {
        let text = std::fs::read_to_string(dir.join(tpl.file_name)).unwrap();
        assert_eq!(text, tpl.source());
    }
}

#[test]
fn eject_fails_if_already_ejected() {
    let tmp = TempDir::new().unwrap();

    eject_templates(tmp.path()).unwrap();
    let err = eject_templates(tmp.path()).unwrap_err();

    assert!(matches!(err, EjectError::AlreadyEjected(_)));
    assert!(err.to_string().contains("already ejected"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn edited_ejected_template_is_used_for_generation() {
    let tmp = TempDir::new().unwrap();
    let dir = eject_templates(tmp.path()).unwrap();
    std::fs::write(
        dir.join("requirements.txt.tera"),
        "fastapi\nuvicorn\n# flow {{ flow_id }}\n",
    )
    .unwrap();

    let store = TemplateStore::with_override_dir(&dir).unwrap();
    let bundle = BundleGenerator::new(&store)
        .generate(&sample_flow(), &tmp.path().join("out"))
        .unwrap();

    let manifest = std::fs::read_to_string(bundle.join("requirements.txt")).unwrap();
    assert_eq!(manifest, "fastapi\nuvicorn\n# flow a1b2c3\n");
}
