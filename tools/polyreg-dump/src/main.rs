// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Snapshot inspector: prints the types stored in a registry snapshot.

use std::path::PathBuf;
use std::process;

use polyreg::{RegistryGroup, SnapshotStore, TypeRegistry, TypeRole};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let dir = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("snapshot")
    };

    println!("polyreg-dump: registry snapshot inspector");
    println!("Reading snapshot at {}...", dir.display());
    println!();

    if !dir.exists() {
        eprintln!("[ERR] no such directory: {}", dir.display());
        process::exit(1);
    }

    let store = match SnapshotStore::new(dir.clone()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("[ERR] {}", e);
            process::exit(1);
        }
    };

    // A snapshot is either grouped (subdirectory per namespace root) or
    // flat (descriptor files at the top level).  Try grouped first.
    match store.load_group() {
        Ok(group) if !group.is_empty() => print_group(&group),
        Ok(_) => match store.load() {
            Ok(registry) if !registry.is_empty() => print_registry("(flat)", &registry),
            Ok(_) => println!("snapshot is empty"),
            Err(e) => {
                eprintln!("[ERR] {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("[ERR] {}", e);
            process::exit(1);
        }
    }
}

fn print_group(group: &RegistryGroup) {
    for root in group.roots() {
        if let Some(registry) = group.registry_for_root(&root) {
            print_registry(&root, registry);
        }
    }
    println!("{} types total", group.len());
}

fn print_registry(root: &str, registry: &TypeRegistry) {
    println!("root {} ({} types)", root, registry.len());
    let mut descriptors: Vec<_> = registry.iter().collect();
    descriptors.sort_by(|a, b| a.discriminator.cmp(&b.discriminator));
    for desc in descriptors {
        let role = match desc.role {
            TypeRole::Concrete => "concrete",
            TypeRole::Capability => "capability",
        };
        println!("  {:<11} {}", role, desc.discriminator);
        if let Some(superclass) = &desc.superclass {
            println!("              extends    {}", superclass);
        }
        for tag in &desc.capabilities {
            println!("              implements {}", tag);
        }
        let implemented = desc.implemented_members().count();
        if implemented > 0 {
            println!("              members    {}", implemented);
        }
    }
    println!();
}
