//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Quantum defects](#quantum-defects)
//! - [Radial wavefunctions](#radial-wavefunctions)
//! - [Angular matrix elements](#angular-matrix-elements)
//! - [Field sweeps](#field-sweeps)
//!
//! # Background
//! A Rydberg electron spends almost all of its time far from the ionic core,
//! where it sees a Coulomb potential of unit charge. Its states are then
//! labeled by the hydrogenic quantum numbers *n*, *l*, *m* (or *n*, *L*, *J*
//! when spin-orbit coupling matters), and the only trace of the core is a
//! small, *l*-dependent shift of the energy levels. In an external field *F*
//! along *z*, the Hamiltonian is
//! ```text
//! H = H₀ + F z + (B / 2) Lz + (B² / 8) (x² + y²)
//! ```
//! for an electric field *F* and a magnetic field *B*, both along *z*. The
//! last two terms are the (orbital) Zeeman and diamagnetic interactions.
//! Writing *z* = *r* cos *θ* and *x*² + *y*² = *r*² sin² *θ*, every
//! interaction matrix element factors into a radial part and an angular part.
//! This crate computes the former numerically and the latter in closed form,
//! then diagonalizes *H* in a truncated basis for each value of the field.
//!
//! # Units
//! Everything is in atomic units, with the Hartree energy and Bohr radius
//! scaled by the reduced mass of the electron,
//! ```text
//!             M - mₑ
//! μ / mₑ  =  --------
//!                M
//!
//! E_h* = E_h μ / mₑ,    a₀* = a₀ mₑ / μ
//! ```
//! where *M* is the mass of the atom. Electric fields are then measured in
//! units of *E_h\** / (*e* *a₀\**), and magnetic fields in units of
//! *ħ* / (*e* *a₀*²). See [`units::Atom`][crate::units::Atom].
//!
//! # Quantum defects
//! The energy of a state with principal quantum number *n* is
//! ```text
//!         1     1
//! W = - ----- -----
//!         2    n*²
//!
//! n* = n - δ(n, L, J)
//! ```
//! up to small fine-structure and finite-mass corrections. The defect *δ* is
//! given by the extended Ritz formula[^1]
//! ```text
//!                 c₁          c₂
//! δ = c₀ + ------------ + ------------ + ...
//!           (n - δ)²      (n - δ)⁴
//! ```
//! which is implicit in *δ*. It is solved by fixed-point iteration, starting
//! from *δ* = *c₀*, for exactly [`QD_ITERS`][crate::QD_ITERS] iterations.
//! States with high *L* have defects too small to matter and are treated as
//! hydrogenic.
//!
//! # Radial wavefunctions
//! Radial wavefunctions are found by integrating the radial Schrödinger
//! equation with Numerov's method[^2]. Under the change of variables
//! ```text
//! x = ln r
//! y = √r R(r)
//! ```
//! the equation becomes
//! ```text
//! ∂²y
//! --- = g(x) y
//! ∂x²
//!
//! g(x) = 2 r² (V(r) - W) + (l + 1/2)²
//! ```
//! with *V*(*r*) = -1/*r*, which removes the first-derivative term and
//! spreads grid points evenly over the many oscillations near the core and
//! the slowly varying tail far from it. On a grid with uniform spacing *h* in
//! *x*, Numerov's three-point recursion is
//! ```text
//!                 12          /            24  \      /     12 \
//!         y[i-2] (g[i-2] - --) + y[i-1] (10 g[i-1] + --)
//!                 h²          \            h² /       \     h² /
//! y[i] = -------------------------------------------------------
//!                              12
//!                              -- - g[i]
//!                              h²
//! ```
//! with *O*(*h*⁶) local error. Integration runs inward, from an outer radius
//! far beyond the classical turning point (where the true wavefunction is
//! exponentially small) toward *r* = 0:
//! ```text
//! r_max = 2 n_max (n_max + 15)
//! ```
//! The first grid point is moved inward from *r_max* to the nearest multiple
//! of *h* (in *x*) below *r* = 2 *n* (*n* + 15), so that wavefunctions for
//! different *n* sharing *n_max* and *h* are sampled at exactly the same
//! points. Their overlaps are then plain sums over the common points, with no
//! interpolation.
//!
//! Inward integration is unstable inside the inner classical turning point
//! ```text
//! r_in = n² - n √(n² - l (l + 1))
//! ```
//! where the solution diverges as *r*^(-*l* - 1) for any *n* that is not an
//! exact eigenvalue. Inside *r_in*, integration stops as soon as the relative
//! growth in *y* over one step exceeds the relative growth of
//! *r*^(-*l* - 1), or at the inner cutoff `rmin`, whichever comes first.
//! The result is normalized such that
//! ```text
//! Σ y[i]² r[i]² = 1
//! ```
//! which is the discrete form of ∫ *R*² *r*² d*r* = 1 under d*r* = *r* d*x*.
//! Radial matrix elements follow as
//! ```text
//! ⟨n₁, l₁| r^p |n₂, l₂⟩ = Σ y₁[i] y₂[i] r[i]^(2 + p)
//! ```
//!
//! # Angular matrix elements
//! The angular parts of the Stark and diamagnetic interactions are
//! ```text
//! ⟨l, m| cos θ |l ± 1, m⟩
//! ⟨l, m| sin² θ |l, m⟩
//! ⟨l, m| sin² θ |l ± 2, m⟩
//! ```
//! all of which follow from the recursion relations of the spherical
//! harmonics[^3]. For an electric field perpendicular to the quantization
//! axis, cos *θ* is replaced by sin *θ* cos *φ*, which couples *m* to *m* ± 1
//! instead. All other elements vanish, so the angular factor also serves as a
//! selection rule for the (expensive) radial factor.
//!
//! # Field sweeps
//! At each field value, the total Hamiltonian is real and symmetric, so its
//! eigenvalues are found by dense symmetric diagonalization and come back in
//! ascending order. Levels that cross as the field changes are therefore not
//! followed through the crossing: the *k*-th eigenvalue at each field is
//! simply the *k*-th lowest. Storing eigenvectors for every field value
//! requires memory growing as (fields) × (basis size)².
//!
//! [^1]: T. F. Gallagher, *Rydberg Atoms*. Cambridge University Press (1994).
//!
//! [^2]: M. L. Zimmerman et al., "Stark structure of the Rydberg states of
//! alkali-metal atoms." Phys. Rev. A **20** 2251 (1979).
//!
//! [^3]: H. A. Bethe and E. E. Salpeter, *Quantum Mechanics of One- and
//! Two-Electron Atoms*. Springer (1957).
