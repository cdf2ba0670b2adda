mod common;

use common::Fixture;
use tsdoc::program::{
    ExportDecl, ExportElement, FunctionDecl, ModifierFlags, ModuleSpecifier, Statement,
};
use tsdoc::{Generator, ModuleNaming, TypeRef};

/// `main.ts` re-exports `X` and `helper` from `./sub`; `sub.ts` also declares `Y`.
fn reexporting_program(elements: Vec<ExportElement>) -> tsdoc::Program {
    let mut fx = Fixture::new();
    let (main, _) = fx.unit_scope();
    let (sub, sub_scope) = fx.unit_scope();

    let x_type = fx.class_type("X", sub_scope);
    let x_ref = fx.reference("X", x_type);
    let members = vec![fx.property("peer", ModifierFlags::empty(), Some(x_ref))];
    let x = fx.class("X", ModifierFlags::EXPORT, members);
    let y = fx.class("Y", ModifierFlags::EXPORT, Vec::new());
    let helper = FunctionDecl {
        node: fx.builder.node_id(),
        name: Some("helper".into()),
        modifiers: ModifierFlags::EXPORT,
    };
    fx.add_unit(
        sub,
        "sub.ts",
        vec![Statement::Class(x), Statement::Class(y), Statement::Function(helper)],
    );

    let export = ExportDecl {
        node: fx.builder.node_id(),
        text: "export { ... } from \"./sub\"".into(),
        module_specifier: Some(ModuleSpecifier::String("./sub".into())),
        elements: Some(elements),
    };
    let wildcard = ExportDecl {
        node: fx.builder.node_id(),
        text: "export * from \"./sub\"".into(),
        module_specifier: Some(ModuleSpecifier::String("./sub".into())),
        elements: None,
    };
    let main_fn = FunctionDecl {
        node: fx.builder.node_id(),
        name: Some("run".into()),
        modifiers: ModifierFlags::EXPORT,
    };
    fx.add_unit(
        main,
        "main.ts",
        vec![
            Statement::Export(export),
            Statement::Export(wildcard),
            Statement::Function(main_fn),
        ],
    );
    fx.build()
}

fn specifier(name: &str) -> ExportElement {
    ExportElement::Specifier {
        name: name.into(),
        property_name: None,
    }
}

#[test]
fn reexported_class_moves_into_main_with_a_rewrite() {
    let program = reexporting_program(vec![specifier("X"), specifier("helper"), specifier("Missing")]);
    let naming = ModuleNaming::new("pkg", "out");
    let extraction = Generator::new(&program, &naming).extract().unwrap();

    assert_eq!(extraction.main_module, "pkg");
    assert_eq!(extraction.reexports["pkg/out/sub"], ["X", "helper", "Missing"]);

    let flattened = extraction.flatten();
    let sub = &flattened.models["pkg/out/sub"];
    let main = &flattened.models["pkg"];

    assert!(sub.classes.iter().all(|c| c.name != "X"));
    assert!(sub.functions.is_empty());
    assert_eq!(sub.classes.len(), 1);

    let x = main.classes.iter().find(|c| c.name == "X").unwrap();
    assert_eq!(x.module_path, "module:pkg");
    assert!(main.functions.iter().any(|f| f.name == "helper"));
    assert!(main.functions.iter().any(|f| f.name == "run"));

    assert_eq!(flattened.rewrites.get("module:pkg/out/sub.X"), Some("module:pkg.X"));
    assert_eq!(flattened.rewrites.len(), 1);

    // References resolved before flattening still point at the origin.
    assert_eq!(
        x.properties[0].types,
        vec![TypeRef::name("module:pkg/out/sub.X")]
    );
}

#[test]
fn aliased_specifiers_record_the_origin_name() {
    let program = reexporting_program(vec![
        ExportElement::Specifier {
            name: "Renamed".into(),
            property_name: Some("Y".into()),
        },
        ExportElement::Other {
            text: "default".into(),
        },
    ]);
    let naming = ModuleNaming::new("pkg", "out");
    let extraction = Generator::new(&program, &naming).extract().unwrap();
    assert_eq!(extraction.reexports["pkg/out/sub"], ["Y"]);

    let flattened = extraction.flatten();
    assert!(flattened.models["pkg"].classes.iter().any(|c| c.name == "Y"));
    assert_eq!(flattened.rewrites.get("module:pkg/out/sub.Y"), Some("module:pkg.Y"));
}

#[test]
fn empty_reexport_mapping_changes_nothing() {
    let program = reexporting_program(Vec::new());
    let naming = ModuleNaming::new("pkg", "out");
    let extraction = Generator::new(&program, &naming).extract().unwrap();
    let before = extraction.models.clone();

    let mut models = extraction.models;
    let rewrites = tsdoc::flatten::flatten_models(&mut models, &Default::default(), "pkg");

    assert!(rewrites.is_empty());
    assert_eq!(models, before);
}

#[test]
fn non_main_units_do_not_record_reexports() {
    let program = reexporting_program(vec![specifier("X")]);
    let naming = ModuleNaming::new("pkg", "out").with_main_file("out/other.js");
    let extraction = Generator::new(&program, &naming).extract().unwrap();

    assert!(extraction.reexports.is_empty());
    let flattened = extraction.flatten();
    assert!(flattened.rewrites.is_empty());
    assert!(flattened.models["pkg/out/sub"].classes.iter().any(|c| c.name == "X"));
}
