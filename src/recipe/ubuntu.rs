//! Ubuntu base images: apt build tooling on top of the stock release image.

use super::{BaseRecipe, BASE_FOOTER, BASE_HEADER};
use crate::distro::DistroTarget;

pub struct UbuntuRecipe;

impl BaseRecipe for UbuntuRecipe {
    fn instructions(&self, target: &DistroTarget) -> Vec<String> {
        vec![
            BASE_HEADER.to_string(),
            format!("FROM {}:{}", target.distro, target.release),
            "ENV DEBIAN_FRONTEND=noninteractive".to_string(),
            "RUN apt-get update".to_string(),
            "RUN apt-get install -y build-essential libelf-dev".to_string(),
            "RUN apt-get install -y wget git".to_string(),
            BASE_FOOTER.to_string(),
            String::new(),
        ]
    }
}
