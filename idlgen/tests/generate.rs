//! End-to-end generation from an XML IDL.

use idlgen::prelude::*;
use idlgen::write_sources;

const DOMAIN_IDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<types>
    <builtin name="libxl_string" ctype="char *" destructor="free"/>
    <builtin name="libxl_cpumap" destructor="libxl_cpumap_destroy" passby="reference"/>
    <builtin name="libxl_uuid"/>

    <struct name="libxl_device_nic" destructor="libxl_device_nic_destroy">
        <comment>A network interface.</comment>
        <field name="devid" type="int"/>
        <field name="mac" type="uint8_t" length="6"/>
        <field name="bridge" type="libxl_string" comment="Bridge to attach to."/>
    </struct>

    <struct name="libxl_domain_build_info" destructor="libxl_domain_build_info_destroy">
        <field name="max_vcpus" type="int"/>
        <field name="cpumap" type="libxl_cpumap"/>
        <field name="hvm" type="bool"/>
        <keyed_union name="u" keyvar="hvm">
            <struct name="hvm" when="%s">
                <field name="firmware" type="libxl_string"/>
                <field name="pae" type="bool" width="1"/>
            </struct>
            <struct name="pv" when="!%s">
                <field name="kernel" type="libxl_string"/>
                <field name="bootloader" type="libxl_string" const="true"/>
            </struct>
        </keyed_union>
    </struct>

    <struct name="libxl_domain_config" destructor="libxl_domain_config_destroy">
        <field name="uuid" type="libxl_uuid"/>
        <field name="b_info" type="libxl_domain_build_info"/>
        <field name="nic" type="libxl_device_nic" reference="true"/>
    </struct>

    <struct name="libxl_handle" destructor="libxl_handle_close" autogenerate="false">
        <field name="fd" type="int"/>
    </struct>
</types>"#;

fn sources() -> GeneratedSources {
    let model = parse_idl(DOMAIN_IDL).expect("Failed to parse IDL");
    Generator::new(&model)
        .with_config(GeneratorConfig::new().header_guard("__LIBXL_TYPES_H"))
        .generate()
        .expect("Failed to generate")
}

#[test]
fn test_header_declarations() {
    let header = sources().header;

    let expected_build_info = "typedef struct {
    int max_vcpus;
    libxl_cpumap cpumap;
    bool hvm;
    union {
        struct {
            char * firmware;
            bool pae:1;
        } hvm;
        struct {
            char * kernel;
            const char * bootloader;
        } pv;
    } u;
} libxl_domain_build_info;
void libxl_domain_build_info_destroy(libxl_domain_build_info *p);
";
    assert!(header.contains(expected_build_info), "{}", header);

    let expected_nic = "/*
 * A network interface.
 */
typedef struct {
    int devid;
    uint8_t mac[6];
    /*
     * Bridge to attach to.
     */
    char * bridge;
} libxl_device_nic;
";
    assert!(header.contains(expected_nic), "{}", header);
    assert!(header.contains("    libxl_device_nic * nic;\n"));
    assert!(header.contains("void libxl_handle_close(libxl_handle *p);\n"));
    assert!(header.starts_with("#ifndef __LIBXL_TYPES_H\n#define __LIBXL_TYPES_H\n"));
    assert!(header.ends_with("#endif /* __LIBXL_TYPES_H */\n"));
}

#[test]
fn test_build_info_destructor() {
    let implementation = sources().implementation;

    let expected = "void libxl_domain_build_info_destroy(libxl_domain_build_info *p)
{
    libxl_cpumap_destroy(&p->cpumap);
    if (p->hvm) {
        free(p->u.hvm.firmware);
    }
    if (!p->hvm) {
        free(p->u.pv.kernel);
    }
    memset(p, IDLGEN_DTOR_POISON, sizeof(*p));
}
";
    assert!(implementation.contains(expected), "{}", implementation);
}

#[test]
fn test_nested_destructors_delegate() {
    let implementation = sources().implementation;

    let expected = "void libxl_domain_config_destroy(libxl_domain_config *p)
{
    libxl_domain_build_info_destroy(&p->b_info);
    libxl_device_nic_destroy(p->nic);
    memset(p, IDLGEN_DTOR_POISON, sizeof(*p));
}
";
    assert!(implementation.contains(expected), "{}", implementation);
}

#[test]
fn test_only_autogenerated_destructors_defined() {
    let implementation = sources().implementation;

    assert!(implementation.contains("void libxl_device_nic_destroy(libxl_device_nic *p)\n"));
    assert!(!implementation.contains("libxl_handle_close"));
    assert_eq!(implementation.matches("memset(p, ").count(), 3);
}

#[test]
fn test_write_sources_to_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let idl = dir.path().join("libxl_types.xml");
    let header = dir.path().join("libxl_types.h");
    let implementation = dir.path().join("libxl_types.c");
    std::fs::write(&idl, DOMAIN_IDL).expect("write idl");

    write_sources(&idl, &header, &implementation, GeneratorConfig::new())
        .expect("write sources");

    let written = std::fs::read_to_string(&implementation).expect("read implementation");
    assert!(written.contains("#define IDLGEN_DTOR_POISON 0xa5\n"));
    assert!(header.exists());
}
