mod common;

use common::{class_bytes, jar, read_jar, Entry, MethodDef};
use mcinjector::archive;
use mcinjector::inject::{Error, Injector, Settings};
use mcinjector::jvm::model::Class;
use mcinjector::mappings::MappingTable;
use std::io::Cursor;

fn entry(name: &str, contents: &[u8]) -> Entry {
    (String::from(name), Some(contents.to_vec()))
}

fn directory(name: &str) -> Entry {
    (String::from(name), None)
}

fn sample_jar() -> Vec<u8> {
    jar(&[
        entry("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
        directory("net/"),
        directory("net/minecraft/"),
        entry(
            "net/minecraft/Foo.class",
            &class_bytes(
                "net/minecraft/Foo",
                vec![MethodDef::new("func_123_a", "(I)V")],
            ),
        ),
        entry(".hidden.class", b"not really a class"),
        entry("assets/lang/en_US.lang", b"item.foo=Foo"),
    ])
}

fn run(injector: &mut Injector, input: &[u8]) -> Result<Vec<u8>, Error> {
    let output = archive::transform(
        Cursor::new(input),
        Cursor::new(Vec::new()),
        |bytes| injector.process_class(bytes),
    )?;
    Ok(output.into_inner())
}

#[test]
fn entries_keep_their_order() {
    let input = sample_jar();
    let mut injector = Injector::new(Settings::new(1), MappingTable::new());
    let output = read_jar(&run(&mut injector, &input).unwrap());

    let names: Vec<&str> = output.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "META-INF/MANIFEST.MF",
            "net/",
            "net/minecraft/",
            "net/minecraft/Foo.class",
            ".hidden.class",
            "assets/lang/en_US.lang",
        ]
    );
    assert_eq!(output[1].1, None);
    assert_eq!(output[2].1, None);
}

#[test]
fn other_entries_are_copied_verbatim() {
    let input = sample_jar();
    let mut injector = Injector::new(Settings::new(1), MappingTable::new());
    let output = read_jar(&run(&mut injector, &input).unwrap());
    let original = read_jar(&input);

    for index in [0, 4, 5] {
        assert_eq!(output[index], original[index]);
    }
}

#[test]
fn classes_are_rewritten() {
    let input = sample_jar();
    let mut injector = Injector::new(Settings::new(1), MappingTable::new());
    let output = read_jar(&run(&mut injector, &input).unwrap());

    let class = Class::parse(output[3].1.as_ref().unwrap()).unwrap();
    let locals = &class.methods[0].code.as_ref().unwrap().local_variables;
    assert_eq!(locals[1].name, "p_123_1_");
    assert_eq!(injector.out_mappings().len(), 1);
}

#[test]
fn handler_sees_only_classes() {
    let input = sample_jar();
    let mut seen = 0;
    archive::transform(Cursor::new(&input), Cursor::new(Vec::new()), |bytes| {
        seen += 1;
        Ok(bytes.to_vec())
    })
    .unwrap();
    assert_eq!(seen, 1);
}

#[test]
fn output_is_deterministic() {
    let input = sample_jar();
    let first = run(
        &mut Injector::new(Settings::new(5), MappingTable::new()),
        &input,
    )
    .unwrap();
    let second = run(
        &mut Injector::new(Settings::new(5), MappingTable::new()),
        &input,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn failing_class_aborts_the_pass() {
    let input = jar(&[
        entry("a.txt", b"a"),
        entry("net/minecraft/Broken.class", b"\xCA\xFE\xBA\xBE"),
        entry("b.txt", b"b"),
    ]);
    let mut injector = Injector::new(Settings::new(0), MappingTable::new());
    assert!(matches!(
        run(&mut injector, &input),
        Err(Error::ClassFile(_))
    ));
}

#[test]
fn not_an_archive() {
    let mut injector = Injector::new(Settings::new(0), MappingTable::new());
    assert!(matches!(
        run(&mut injector, b"definitely not a zip file"),
        Err(Error::Zip(_))
    ));
}

#[test]
fn missing_input_file() {
    let err = archive::transform_paths(
        "/nonexistent/input.jar",
        std::env::temp_dir().join("mcinjector-unused-output.jar"),
        |bytes| Ok(bytes.to_vec()),
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Could not open input file"));
}

#[test]
fn files_on_disk() {
    let dir = std::env::temp_dir().join(format!("mcinjector-archive-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.jar");
    let output = dir.join("out.jar");
    let out_map = dir.join("out.map");
    std::fs::write(&input, sample_jar()).unwrap();

    let mut injector = Injector::new(Settings::new(1), MappingTable::new());
    injector.process_jar(&input, &output).unwrap();
    injector.save_mappings(&out_map).unwrap();

    let written = read_jar(&std::fs::read(&output).unwrap());
    assert_eq!(written.len(), 6);
    assert_eq!(
        std::fs::read_to_string(&out_map).unwrap(),
        "#max index=1\nnet/minecraft/Foo.func_123_a(I)V=|p_123_1_\n"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
