use crate::core::models::atom::{Atom, Position};
use crate::core::models::attribute::Attribute;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::Interaction;
use crate::engine::config::VirtualSiteConfig;
use crate::engine::error::EngineError;
use crate::engine::processor::Processor;
use std::collections::BTreeMap;
use tracing::debug;

pub const VIRTUAL_SITES_KIND: &str = "virtual_sitesn";

/// Adds the virtual sites and include statements of the virtual-site Go model.
///
/// Go potentials are applied on virtual sites sitting on top of the backbone
/// beads rather than on the beads themselves. The potentials come from an
/// external program as topology fragments; this stage only adds the sites
/// and one `#include` line per configured section to the
/// `post_section_lines` metadata of each molecule.
///
/// Every molecule must carry a molecule type name.
#[derive(Debug, Clone, Default)]
pub struct VirtualGoSites {
    config: VirtualSiteConfig,
}

impl VirtualGoSites {
    pub const NAME: &'static str = "virtual-go-sites";

    pub fn new(config: VirtualSiteConfig) -> Self {
        Self { config }
    }
}

impl Processor for VirtualGoSites {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run_molecule(&self, index: usize, mut molecule: Molecule) -> Result<Molecule, EngineError> {
        let moltype = molecule
            .meta
            .moltype
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(EngineError::MissingMoleculeType {
                stage: Self::NAME,
                index,
            })?;

        let added = add_virtual_sites(&mut molecule, &moltype, &self.config);
        debug!(moltype = %moltype, added, "Added virtual Go sites.");

        for section in &self.config.sections {
            molecule
                .meta
                .post_section_lines
                .entry(section.clone())
                .or_default()
                .push(format!("#include \"{moltype}_{section}_VirtGoSites.itp\""));
        }
        Ok(molecule)
    }
}

/// Places one virtual site on every backbone bead of `molecule`.
///
/// Sites are appended after the existing atoms, each in a new charge group,
/// and copy the residue name, number and chain of their bead. Their position
/// is an alias of the bead, so moving the bead moves the site. The bead type
/// is `"{moltype}_{resid}"`. Each site is recorded as a `virtual_sitesn`
/// interaction to its bead.
///
/// Returns the number of sites added. A molecule without atoms is left
/// untouched.
pub fn add_virtual_sites(molecule: &mut Molecule, moltype: &str, config: &VirtualSiteConfig) -> usize {
    if molecule.is_empty() {
        return 0;
    }

    let mut charge_group = molecule
        .atoms_iter()
        .filter_map(|(_, atom)| atom.charge_group)
        .max()
        .unwrap_or(0);

    let backbone: Vec<_> = molecule
        .atoms_iter()
        .filter(|(_, atom)| atom.name == config.backbone)
        .map(|(id, atom)| (id, atom.clone()))
        .collect();

    let mut interactions = Vec::with_capacity(backbone.len());
    for (bead_id, bead) in backbone {
        charge_group += 1;
        let mut site = Atom::new(&config.atom_name, &bead.residue_name, bead.residue_number, &bead.chain);
        site.position = Position::Aliased(bead_id);
        site.atom_type = Some(format!("{moltype}_{}", bead.residue_number));
        site.charge = Some(config.charge);
        site.charge_group = Some(charge_group);
        site.molecule_index = bead.molecule_index;

        let site_id = molecule.add_atom(site);
        interactions.push(Interaction::new(
            vec![site_id, bead_id],
            vec!["1".to_string()],
            BTreeMap::from([
                ("go_vs".to_string(), Attribute::Bool(true)),
                ("group".to_string(), Attribute::from("Virtual go site")),
            ]),
        ));
    }

    let added = interactions.len();
    molecule.extend_interactions(VIRTUAL_SITES_KIND, interactions);
    added
}
