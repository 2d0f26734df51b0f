mod make_bonds;
mod name_moltype;
mod virtual_go_sites;

pub use make_bonds::MakeBonds;
pub use name_moltype::NameMoleculeTypes;
pub use virtual_go_sites::{VIRTUAL_SITES_KIND, VirtualGoSites, add_virtual_sites};
