#![no_main]
use bllvm_module_loader::module::registry::ModuleManifest;
use bllvm_module_loader::module::validation::DescriptorValidator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Manifests come from disk: arbitrary text must never panic the parser
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(manifest) = ModuleManifest::from_toml_str(text) {
        // Accepted manifests always carry a name
        assert!(!manifest.descriptor.name.is_empty());

        let _ = manifest.flat_config();
        let _ = DescriptorValidator::new().validate(&manifest.descriptor);
    }
});
