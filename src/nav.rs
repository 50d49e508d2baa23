//! The static navigation bar rendered by the chrome on every page.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub target: &'static str,
}

pub const BRAND: NavLink = NavLink {
    label: "Organigrama de Proyectos y Actividades",
    target: "/tasks",
};

pub const NAV_LINKS: [NavLink; 4] = [
    NavLink {
        label: "Crear Proyecto",
        target: "/project-create",
    },
    NavLink {
        label: "Crear Tarea",
        target: "/tasks-create",
    },
    NavLink {
        label: "Visualizar Proyectos",
        target: "/projects",
    },
    NavLink {
        label: "Visualizar Tareas",
        target: "/tasks",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ROUTE_TABLE;

    #[test]
    fn every_link_targets_a_registered_route() {
        for link in NAV_LINKS {
            assert!(
                ROUTE_TABLE.iter().any(|spec| spec.pattern == link.target),
                "nav link '{}' targets unregistered path {}",
                link.label,
                link.target
            );
        }
        assert!(ROUTE_TABLE.iter().any(|spec| spec.pattern == BRAND.target));
    }

    #[test]
    fn links_are_distinct() {
        for (i, a) in NAV_LINKS.iter().enumerate() {
            for b in &NAV_LINKS[i + 1..] {
                assert_ne!(a.label, b.label);
                assert_ne!(a.target, b.target);
            }
        }
    }
}
